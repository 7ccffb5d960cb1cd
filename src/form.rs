use std::ops::RangeInclusive;

use crate::features::{FeatureVector, FuelType, SellerType, Transmission};

pub const YEAR_RANGE: RangeInclusive<i32> = 2000..=2024;
pub const MIN_PRESENT_PRICE: f64 = 0.1;
pub const PRESENT_PRICE_STEP: f64 = 0.1;
pub const KMS_STEP: f64 = 1000.0;

/// Raw widget state. Widgets bind straight to these fields; only
/// `to_features` enforces the ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct CarForm {
    pub year: i32,
    pub present_price: f64,
    pub kms_driven: f64,
    pub fuel_type: FuelType,
    pub seller_type: SellerType,
    pub transmission: Transmission,
    pub owner_count: f64,
}

impl Default for CarForm {
    fn default() -> Self {
        CarForm {
            year: *YEAR_RANGE.start(),
            present_price: MIN_PRESENT_PRICE,
            kms_driven: 0.0,
            fuel_type: FuelType::Petrol,
            seller_type: SellerType::Dealer,
            transmission: Transmission::Manual,
            owner_count: 0.0,
        }
    }
}

impl CarForm {
    pub fn year_options() -> impl Iterator<Item = i32> {
        YEAR_RANGE
    }

    pub fn to_features(&self) -> FeatureVector {
        FeatureVector {
            year: self.year.clamp(*YEAR_RANGE.start(), *YEAR_RANGE.end()),
            present_price: non_negative(self.present_price).max(MIN_PRESENT_PRICE),
            kms_driven: whole(self.kms_driven),
            fuel_type: self.fuel_type,
            seller_type: self.seller_type,
            transmission: self.transmission,
            owner_count: whole(self.owner_count),
        }
    }
}

fn non_negative(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

fn whole(v: f64) -> u32 {
    non_negative(v).round().min(u32::MAX as f64) as u32
}
