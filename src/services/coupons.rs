use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Coupon {
    pub code: &'static str,
    pub percent: u32,
    pub description: &'static str,
}

pub const COUPONS: [Coupon; 3] = [
    Coupon {
        code: "STUDENT20",
        percent: 20,
        description: "20% off for students",
    },
    Coupon {
        code: "NEW10",
        percent: 10,
        description: "10% off your first session",
    },
    Coupon {
        code: "SPECIAL25",
        percent: 25,
        description: "25% off on special occasions",
    },
];

/// Discount percentage for a coupon code. Unknown codes are worth 0.
pub fn discount_for(code: &str) -> u32 {
    COUPONS
        .iter()
        .find(|c| c.code == code)
        .map(|c| c.percent)
        .unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    pub base: u32,
    pub discount: u32,
    pub total: u32,
}

/// Applies `discount` percent to `base`, rounding the saving down so the
/// total never drops below what the percentage allows.
pub fn price_after_discount(base: u32, discount: u32) -> Pricing {
    let discount = discount.min(100);
    // Widened so large prices can't overflow; the saving never exceeds `base`
    let saving = (u64::from(base) * u64::from(discount) / 100) as u32;
    Pricing {
        base,
        discount,
        total: base - saving,
    }
}
