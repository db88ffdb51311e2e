//! # Synthetic Dataset
//!
//! Generates a plausible monitoring network for all 38 Tamil Nadu districts.
//! Readings follow regional profiles: coastal aquifers are saline, the
//! Cauvery delta is shallow and high-yield, the Western Ghats are fresh and
//! shallow, the hard-rock interior sits in between.
//!
//! Generation is reproducible when a seed is supplied.

use crate::stats::round_to;
use crate::{QualityGrade, RechargeTrend, RiskLevel, WellRecord, WellStatus};
use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::Value;

/// One district of the generator's table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistrictProfile {
    pub name: &'static str,
    /// Three-letter code used in well ids; unique across the table.
    pub code: &'static str,
    pub lat: f64,
    pub lon: f64,
    pub region: &'static str,
    pub aquifer: &'static str,
    pub coastal: bool,
}

const fn district(
    name: &'static str,
    code: &'static str,
    lat: f64,
    lon: f64,
    region: &'static str,
    aquifer: &'static str,
    coastal: bool,
) -> DistrictProfile {
    DistrictProfile {
        name,
        code,
        lat,
        lon,
        region,
        aquifer,
        coastal,
    }
}

pub const DISTRICTS: &[DistrictProfile] = &[
    district("Chennai", "CHE", 13.0827, 80.2707, "Chennai Metropolitan", "Coastal Alluvial", true),
    district("Coimbatore", "COI", 11.0168, 76.9558, "Kongu Region", "Hard Rock", false),
    district("Madurai", "MAD", 9.9252, 78.1198, "Southern Tamil Nadu", "Hard Rock", false),
    district("Tiruchirappalli", "TRY", 10.7905, 78.7047, "Central Tamil Nadu", "Hard Rock", false),
    district("Salem", "SAL", 11.6643, 78.1460, "Salem Plateau", "Hard Rock", false),
    district("Tiruppur", "TPR", 11.1085, 77.3411, "Kongu Region", "Hard Rock", false),
    district("Erode", "ERO", 11.3410, 77.7172, "Kongu Region", "Alluvial", false),
    district("Thanjavur", "THA", 10.7865, 79.1378, "Cauvery Delta", "Deltaic Alluvial", false),
    district("Thiruvarur", "THI", 10.7725, 79.6370, "Cauvery Delta", "Deltaic Alluvial", false),
    district("Nagapattinam", "NAG", 10.7672, 79.8449, "Coastal Tamil Nadu", "Coastal Alluvial", true),
    district("Cuddalore", "CUD", 11.7480, 79.7714, "Coastal Tamil Nadu", "Coastal Alluvial", true),
    district("Karur", "KAR", 10.9601, 78.0766, "Kongu Region", "Hard Rock", false),
    district("Dindigul", "DIN", 10.3650, 77.9800, "Southern Tamil Nadu", "Hard Rock", false),
    district("Theni", "THE", 10.0104, 77.4768, "Western Ghats", "Hard Rock", false),
    district("Vellore", "VEL", 12.9165, 79.1325, "Northern Tamil Nadu", "Hard Rock", false),
    district("Kancheepuram", "KAN", 12.8342, 79.7036, "Northern Tamil Nadu", "Hard Rock", false),
    district("Tiruvallur", "TVL", 13.1442, 79.9084, "Northern Tamil Nadu", "Hard Rock", false),
    district("Chengalpattu", "CGL", 12.6819, 80.0169, "Northern Tamil Nadu", "Coastal Alluvial", true),
    district("Ranipet", "RAN", 12.9279, 79.3316, "Northern Tamil Nadu", "Hard Rock", false),
    district("Tirupattur", "TPT", 12.4970, 78.5629, "Northern Tamil Nadu", "Hard Rock", false),
    district("Kallakurichi", "KAL", 11.7404, 78.9592, "Northern Tamil Nadu", "Hard Rock", false),
    district("Villupuram", "VIL", 11.9394, 79.4924, "Northern Tamil Nadu", "Hard Rock", false),
    district("Dharmapuri", "DHA", 12.1210, 78.1582, "Northern Tamil Nadu", "Hard Rock", false),
    district("Krishnagiri", "KRI", 12.5196, 78.2138, "Northern Tamil Nadu", "Hard Rock", false),
    district("Namakkal", "NAM", 11.2213, 78.1674, "Salem Plateau", "Hard Rock", false),
    district("Tenkasi", "TEN", 8.9606, 77.3152, "Western Ghats", "Hard Rock", false),
    district("Tirunelveli", "TNV", 8.7139, 77.7567, "Southern Tamil Nadu", "Hard Rock", false),
    district("Thoothukudi", "THO", 8.7642, 78.1348, "Coastal Tamil Nadu", "Coastal Alluvial", true),
    district("Kanyakumari", "KKM", 8.0883, 77.5385, "Coastal Tamil Nadu", "Coastal Alluvial", true),
    district("Ramanathapuram", "RAM", 9.3151, 78.8307, "Coastal Tamil Nadu", "Coastal Alluvial", true),
    district("Sivaganga", "SIV", 9.8432, 78.4808, "Southern Tamil Nadu", "Hard Rock", false),
    district("Virudhunagar", "VIR", 9.5852, 77.9608, "Southern Tamil Nadu", "Hard Rock", false),
    district("Ariyalur", "ARI", 11.1375, 79.0758, "Central Tamil Nadu", "Hard Rock", false),
    district("Perambalur", "PER", 11.2340, 78.8832, "Central Tamil Nadu", "Hard Rock", false),
    district("Pudukkottai", "PUD", 10.3803, 78.8204, "Central Tamil Nadu", "Hard Rock", false),
    district("Tiruvannamalai", "TVM", 12.2319, 79.0676, "Northern Tamil Nadu", "Hard Rock", false),
    district("Mayiladuthurai", "MAY", 11.1035, 79.6550, "Cauvery Delta", "Deltaic Alluvial", false),
    district("Nilgiris", "NIL", 11.4102, 76.6950, "Western Ghats", "Hard Rock", false),
];

const FLUORIDE_BELT: &[&str] = &["Madurai", "Dindigul", "Theni"];
const INDUSTRIAL_BELT: &[&str] = &["Tiruppur", "Erode", "Salem", "Ariyalur"];
const FARMING_BELT: &[&str] = &["Krishnagiri", "Dharmapuri"];
const URBAN_CENTRES: &[&str] = &["Chennai", "Coimbatore", "Madurai", "Salem"];

/// Generator settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    /// RNG seed; `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub min_wells: u32,
    pub max_wells: u32,
    /// Inspection dates fall 5 to 180 days before this date.
    pub today: NaiveDate,
}

impl SynthConfig {
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            seed: None,
            min_wells: 5,
            max_wells: 8,
            today,
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terrain {
    Coastal,
    Delta,
    Hilly,
    Interior,
}

impl DistrictProfile {
    fn terrain(&self) -> Terrain {
        if self.coastal {
            Terrain::Coastal
        } else if self.region.contains("Delta") {
            Terrain::Delta
        } else if self.region.contains("Ghats") || self.name == "Nilgiris" || self.name == "Theni" {
            Terrain::Hilly
        } else {
            Terrain::Interior
        }
    }
}

/// Generate the network, sorted by district then id.
#[must_use]
pub fn generate(config: &SynthConfig) -> Vec<WellRecord> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let (lo, hi) = (
        config.min_wells.min(config.max_wells),
        config.max_wells.max(config.min_wells),
    );

    let mut wells = Vec::new();
    for profile in DISTRICTS {
        let count = rng.gen_range(lo..=hi);
        for n in 1..=count {
            wells.push(generate_well(&mut rng, profile, n, config.today));
        }
    }

    wells.sort_by(|a, b| a.district.cmp(&b.district).then_with(|| a.id.cmp(&b.id)));
    tracing::info!(
        wells = wells.len(),
        districts = DISTRICTS.len(),
        "generated synthetic network"
    );
    wells
}

fn pick<'a>(rng: &mut StdRng, options: &[&'a str]) -> &'a str {
    options.choose(rng).copied().unwrap_or_default()
}

fn generate_well(rng: &mut StdRng, p: &DistrictProfile, n: u32, today: NaiveDate) -> WellRecord {
    let terrain = p.terrain();
    let hilly = terrain == Terrain::Hilly;
    let delta = terrain == Terrain::Delta;

    let base_tds: i32 = match terrain {
        Terrain::Coastal => rng.gen_range(650..=950),
        Terrain::Delta => rng.gen_range(380..=480),
        Terrain::Hilly => rng.gen_range(280..=380),
        Terrain::Interior => rng.gen_range(420..=680),
    };
    let tds = f64::from(base_tds + rng.gen_range(-30..=30));

    let ph = if terrain == Terrain::Coastal {
        rng.gen_range(7.7..8.0)
    } else {
        rng.gen_range(6.9..7.6)
    };
    let conductivity = (tds * 1.9 + f64::from(rng.gen_range(-50..=50_i32))).round();
    let hardness = (tds * 0.38 + f64::from(rng.gen_range(-20..=20_i32))).round();
    let alkalinity = (hardness * 0.6 + f64::from(rng.gen_range(-15..=15_i32))).round();
    let nitrate = f64::from(rng.gen_range(18..=75_i32));
    let fluoride = if FLUORIDE_BELT.contains(&p.name) {
        rng.gen_range(0.8..1.5)
    } else {
        rng.gen_range(0.4..1.0)
    };
    let chloride = f64::from(if terrain == Terrain::Coastal {
        rng.gen_range(300..=450_i32)
    } else {
        rng.gen_range(120..=300_i32)
    });
    let sulfate = (chloride * 0.45 + f64::from(rng.gen_range(-20..=20_i32))).round();
    let iron = rng.gen_range(0.12..0.4);
    let arsenic = rng.gen_range(0.002..0.018);

    let (water_level, depth) = if hilly {
        (rng.gen_range(3.0..6.0), rng.gen_range(18..=28_i32))
    } else if delta {
        (rng.gen_range(5.0..8.0), rng.gen_range(22..=32_i32))
    } else {
        (rng.gen_range(8.0..22.0), rng.gen_range(30..=55_i32))
    };
    let yield_lph: i32 = if hilly {
        rng.gen_range(2800..=3800)
    } else if delta {
        rng.gen_range(2800..=3200)
    } else {
        rng.gen_range(1100..=2200)
    };

    let fluoride = round_to(fluoride, 2);
    let iron = round_to(iron, 2);
    let arsenic = round_to(arsenic, 3);

    let mut well = WellRecord::new(format!("TN-{}-{:03}", p.code, n));
    well.name = format!("{} Well {}", p.name, n);
    well.region = p.region.to_string();
    well.district = p.name.to_string();
    well.state = crate::primitives::DEFAULT_STATE.to_string();
    well.lat = round_to(p.lat + rng.gen_range(-0.2..0.2), 4);
    well.lon = round_to(p.lon + rng.gen_range(-0.2..0.2), 4);
    well.aquifer = format!("{} Aquifer", p.aquifer);
    well.tds_level = tds;
    well.ph = round_to(ph, 1);
    well.conductivity = conductivity;
    well.hardness = Some(hardness);
    well.alkalinity = Some(alkalinity);
    well.nitrate = Some(nitrate);
    well.fluoride = Some(fluoride);
    well.chloride = Some(chloride);
    well.sulfate = Some(sulfate);
    well.iron = Some(iron);
    well.arsenic = Some(arsenic);
    well.contamination_risk = Some(RiskLevel::from_tds(tds));
    well.water_level_meters = round_to(water_level, 1);
    well.depth_meters = f64::from(depth);
    well.yield_lph = f64::from(yield_lph);
    well.recharge_trend = Some(RechargeTrend::from_yield(well.yield_lph));
    well.status = WellStatus::Active;
    well.water_quality_grade = Some(QualityGrade::classify(tds, nitrate, fluoride));
    well.suitable_for_drinking = well.drinkable();
    well.suitable_for_irrigation = Some(well.irrigable());

    let days_ago = rng.gen_range(5..=180);
    well.last_inspection = today
        .checked_sub_days(Days::new(days_ago))
        .unwrap_or(today)
        .format("%Y-%m-%d")
        .to_string();

    // Descriptive attributes
    let well_type = if delta {
        "Open Well"
    } else {
        pick(rng, &["Borewell", "Tube Well"])
    };
    let usage_type = if INDUSTRIAL_BELT.contains(&p.name) {
        pick(rng, &["Industrial", "Agricultural"])
    } else if delta || FARMING_BELT.contains(&p.name) {
        "Agricultural"
    } else {
        pick(rng, &["Domestic", "Agricultural"])
    };
    let ownership = pick(rng, &["Government", "Community", "Private"]);
    let water_source = if p.aquifer.contains("Alluvial") {
        "Unconfined Aquifer"
    } else {
        "Fractured Rock Aquifer"
    };
    let land_use = if terrain == Terrain::Coastal {
        "Coastal"
    } else if URBAN_CENTRES.contains(&p.name) {
        "Urban"
    } else if delta {
        "Agricultural Paddy"
    } else if hilly {
        "Hilly"
    } else {
        pick(rng, &["Rural", "Agricultural", "Urban"])
    };
    let seasonal = if delta || hilly {
        "High"
    } else {
        pick(rng, &["Moderate", "Low"])
    };
    let infrastructure = if usage_type == "Industrial" {
        "Industrial pump"
    } else if hilly {
        "Gravity flow"
    } else {
        pick(rng, &["Submersible pump", "Electric pump", "Hand pump"])
    };

    for (key, value) in [
        ("wellType", well_type),
        ("usageType", usage_type),
        ("ownership", ownership),
        ("waterSource", water_source),
        ("nearbyLandUse", land_use),
        ("seasonalVariation", seasonal),
        ("infrastructure", infrastructure),
    ] {
        well.attributes
            .insert(key.to_string(), Value::String(value.to_string()));
    }

    well.notes = field_notes(&well, terrain == Terrain::Coastal);
    well
}

fn field_notes(well: &WellRecord, coastal: bool) -> String {
    let mut notes = Vec::new();
    if well.risk() == RiskLevel::High {
        notes.push("High TDS. Requires treatment.");
    }
    if well.fluoride.is_some_and(|f| f >= 1.0) {
        notes.push("High fluoride. Requires defluoridation.");
    }
    if coastal {
        notes.push("Seawater intrusion risk.");
    }
    if well.nitrate.is_some_and(|n| n >= 50.0) {
        notes.push("Elevated nitrate levels.");
    }
    if well.suitable_for_drinking != Some(true) {
        notes.push("Not suitable for drinking without treatment.");
    }
    if notes.is_empty() {
        "Stable water quality.".to_string()
    } else {
        notes.join(" ")
    }
}

// =============================================================================
// TESTS
// =============================================================================
