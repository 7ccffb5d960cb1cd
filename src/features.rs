use serde::{Deserialize, Serialize};

/// Number of columns the trained model expects.
pub const FEATURE_COUNT: usize = 7;

/// Column names in model order. Changing this order means retraining.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Year",
    "Present_Price",
    "Kms_Driven",
    "Fuel_Type",
    "Seller_Type",
    "Transmission",
    "Owner",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuelType {
    Petrol,
    Diesel,
    Cng,
}

impl FuelType {
    pub const ALL: [FuelType; 3] = [FuelType::Petrol, FuelType::Diesel, FuelType::Cng];

    pub fn code(self) -> u8 {
        match self {
            FuelType::Petrol => 0,
            FuelType::Diesel => 1,
            FuelType::Cng => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(FuelType::Petrol),
            1 => Some(FuelType::Diesel),
            2 => Some(FuelType::Cng),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FuelType::Petrol => "Petrol",
            FuelType::Diesel => "Diesel",
            FuelType::Cng => "CNG",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.label() == label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SellerType {
    Dealer,
    Individual,
}

impl SellerType {
    pub const ALL: [SellerType; 2] = [SellerType::Dealer, SellerType::Individual];

    pub fn code(self) -> u8 {
        match self {
            SellerType::Dealer => 0,
            SellerType::Individual => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(SellerType::Dealer),
            1 => Some(SellerType::Individual),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SellerType::Dealer => "Dealer",
            SellerType::Individual => "Individual",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transmission {
    Manual,
    Automatic,
}

impl Transmission {
    pub const ALL: [Transmission; 2] = [Transmission::Manual, Transmission::Automatic];

    pub fn code(self) -> u8 {
        match self {
            Transmission::Manual => 0,
            Transmission::Automatic => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Transmission::Manual),
            1 => Some(Transmission::Automatic),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Transmission::Manual => "Manual",
            Transmission::Automatic => "Automatic",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label)
    }
}

/// One car as the model sees it.
///
/// Fields are declared in the same order the model was trained on;
/// `to_row` relies on that and nothing checks it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub year: i32,
    pub present_price: f64, // lakhs
    pub kms_driven: u32,
    pub fuel_type: FuelType,
    pub seller_type: SellerType,
    pub transmission: Transmission,
    pub owner_count: u32,
}

impl FeatureVector {
    /// The reference car used by the standalone predictor.
    pub fn sample() -> Self {
        FeatureVector {
            year: 2014,
            present_price: 5.59,
            kms_driven: 27_000,
            fuel_type: FuelType::Petrol,
            seller_type: SellerType::Dealer,
            transmission: Transmission::Manual,
            owner_count: 0,
        }
    }

    /// Single matrix row, float32 like the training data.
    pub fn to_row(&self) -> [f32; FEATURE_COUNT] {
        [
            self.year as f32,
            self.present_price as f32,
            self.kms_driven as f32,
            self.fuel_type.code() as f32,
            self.seller_type.code() as f32,
            self.transmission.code() as f32,
            self.owner_count as f32,
        ]
    }

    /// Rebuild from raw numbers in model order. Categorical columns must hold
    /// one of their known codes.
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Option<Self> {
        let code = |v: f64| -> Option<u8> {
            if v.fract() == 0.0 && (0.0..=u8::MAX as f64).contains(&v) {
                Some(v as u8)
            } else {
                None
            }
        };

        if values.iter().any(|v| !v.is_finite()) {
            return None;
        }

        Some(FeatureVector {
            year: values[0].round() as i32,
            present_price: values[1].max(0.0),
            kms_driven: values[2].max(0.0).round() as u32,
            fuel_type: FuelType::from_code(code(values[3])?)?,
            seller_type: SellerType::from_code(code(values[4])?)?,
            transmission: Transmission::from_code(code(values[5])?)?,
            owner_count: values[6].max(0.0).round() as u32,
        })
    }
}
