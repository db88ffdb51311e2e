//! # Support Directory
//!
//! Static contact data for the chatbot and the contacts endpoint:
//! - One municipal water office per Tamil Nadu district
//! - Four state-level agencies
//!
//! District lookups ignore case. Districts without an entry resolve to the
//! generic district water supply office.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A municipal water office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MunicipalityContact {
    pub phone: &'static str,
    pub email: &'static str,
    pub helpline: &'static str,
    pub office: &'static str,
}

const fn office(
    office: &'static str,
    phone: &'static str,
    email: &'static str,
    helpline: &'static str,
) -> MunicipalityContact {
    MunicipalityContact {
        phone,
        email,
        helpline,
        office,
    }
}

/// Office returned for districts missing from the directory.
pub const FALLBACK_CONTACT: MunicipalityContact = office(
    "District Water Supply Office",
    "1916",
    "water.tn.gov.in",
    "1916",
);

/// Municipal offices by district, in directory order.
pub const MUNICIPALITIES: &[(&str, MunicipalityContact)] = &[
    ("Chennai", office("Greater Chennai Corporation", "044-2538-4520", "ccmc@tn.gov.in", "1913")),
    ("Coimbatore", office("Coimbatore City Municipal Corporation", "0422-239-0261", "coimbatore.corp@tn.gov.in", "0422-2301100")),
    ("Madurai", office("Madurai City Municipal Corporation", "0452-253-1212", "madurai.corp@tn.gov.in", "0452-2531234")),
    ("Tiruchirappalli", office("Tiruchirappalli City Corporation", "0431-246-0525", "trichy.corp@tn.gov.in", "0431-2460500")),
    ("Salem", office("Salem City Municipal Corporation", "0427-231-5566", "salem.corp@tn.gov.in", "0427-2315500")),
    ("Tiruppur", office("Tiruppur City Municipal Corporation", "0421-222-0222", "tiruppur.corp@tn.gov.in", "0421-2220200")),
    ("Erode", office("Erode Municipal Corporation", "0424-225-6666", "erode.muni@tn.gov.in", "0424-2256600")),
    ("Vellore", office("Vellore City Municipal Corporation", "0416-222-1234", "vellore.corp@tn.gov.in", "0416-2221200")),
    ("Thanjavur", office("Thanjavur Municipal Corporation", "04362-231-555", "thanjavur.muni@tn.gov.in", "04362-231500")),
    ("Dindigul", office("Dindigul Municipal Corporation", "0451-243-0123", "dindigul.muni@tn.gov.in", "0451-2430100")),
    ("Tirunelveli", office("Tirunelveli City Municipal Corporation", "0462-250-1234", "tirunelveli.corp@tn.gov.in", "0462-2501200")),
    ("Kanyakumari", office("Nagercoil Municipality", "04652-247-123", "kanyakumari.muni@tn.gov.in", "04652-247100")),
    ("Thoothukudi", office("Thoothukudi Corporation", "0461-232-1234", "tuticorin.corp@tn.gov.in", "0461-2321200")),
    ("Nagapattinam", office("Nagapattinam Municipality", "04365-242-123", "nagapattinam.muni@tn.gov.in", "04365-242100")),
    ("Cuddalore", office("Cuddalore Municipality", "04142-236-123", "cuddalore.muni@tn.gov.in", "04142-236100")),
    ("Karur", office("Karur Municipality", "04324-241-123", "karur.muni@tn.gov.in", "04324-241100")),
    ("Namakkal", office("Namakkal Municipality", "04286-222-123", "namakkal.muni@tn.gov.in", "04286-222100")),
    ("Theni", office("Theni Municipality", "04546-252-123", "theni.muni@tn.gov.in", "04546-252100")),
    ("Nilgiris", office("Udhagamandalam Municipality", "0423-244-2233", "ooty.muni@tn.gov.in", "0423-2442200")),
    ("Krishnagiri", office("Krishnagiri Municipality", "04343-232-123", "krishnagiri.muni@tn.gov.in", "04343-232100")),
    ("Dharmapuri", office("Dharmapuri Municipality", "04342-230-123", "dharmapuri.muni@tn.gov.in", "04342-230100")),
    ("Villupuram", office("Villupuram Municipality", "04146-222-123", "villupuram.muni@tn.gov.in", "04146-222100")),
    ("Ramanathapuram", office("Ramanathapuram Municipality", "04567-220-123", "ramanathapuram.muni@tn.gov.in", "04567-220100")),
    ("Sivaganga", office("Sivaganga Municipality", "04575-241-123", "sivaganga.muni@tn.gov.in", "04575-241100")),
    ("Virudhunagar", office("Virudhunagar Municipality", "04562-243-123", "virudhunagar.muni@tn.gov.in", "04562-243100")),
    ("Ariyalur", office("Ariyalur Municipality", "04329-222-123", "ariyalur.muni@tn.gov.in", "04329-222100")),
    ("Perambalur", office("Perambalur Municipality", "04328-222-123", "perambalur.muni@tn.gov.in", "04328-222100")),
    ("Pudukkottai", office("Pudukkottai Municipality", "04322-220-123", "pudukkottai.muni@tn.gov.in", "04322-220100")),
    ("Thiruvarur", office("Thiruvarur Municipality", "04366-220-123", "thiruvarur.muni@tn.gov.in", "04366-220100")),
    ("Tiruvannamalai", office("Tiruvannamalai Municipality", "04175-222-123", "tiruvannamalai.muni@tn.gov.in", "04175-222100")),
    ("Kancheepuram", office("Kancheepuram Municipality", "044-2722-2123", "kancheepuram.muni@tn.gov.in", "044-27222100")),
    ("Chengalpattu", office("Chengalpattu Municipality", "044-2742-2123", "chengalpattu.muni@tn.gov.in", "044-27422100")),
    ("Tiruvallur", office("Tiruvallur Municipality", "044-2766-2123", "tiruvallur.muni@tn.gov.in", "044-27662100")),
    ("Ranipet", office("Ranipet Municipality", "04172-222-123", "ranipet.muni@tn.gov.in", "04172-222100")),
    ("Tirupattur", office("Tirupattur Municipality", "04179-222-123", "tirupattur.muni@tn.gov.in", "04179-222100")),
    ("Kallakurichi", office("Kallakurichi Municipality", "04151-222-123", "kallakurichi.muni@tn.gov.in", "04151-222100")),
    ("Tenkasi", office("Tenkasi Municipality", "04633-222-123", "tenkasi.muni@tn.gov.in", "04633-222100")),
    ("Mayiladuthurai", office("Mayiladuthurai Municipality", "04364-222-123", "mayiladuthurai.muni@tn.gov.in", "04364-222100")),
];

/// Directory entry for `district`, ignoring case.
///
/// Returns the canonical district name alongside the contact.
#[must_use]
pub fn find_municipality(district: &str) -> Option<(&'static str, &'static MunicipalityContact)> {
    let wanted = district.trim();
    MUNICIPALITIES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(wanted))
        .map(|(name, contact)| (*name, contact))
}

/// Contact for `district`, or [`FALLBACK_CONTACT`].
#[must_use]
pub fn municipality_contact(district: &str) -> MunicipalityContact {
    find_municipality(district).map_or(FALLBACK_CONTACT, |(_, c)| *c)
}

/// The whole municipal directory, serialized as an object keyed by district.
#[derive(Debug, Clone, Copy, Default)]
pub struct Municipalities;

impl Serialize for Municipalities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(MUNICIPALITIES.len()))?;
        for (district, contact) in MUNICIPALITIES {
            map.serialize_entry(district, contact)?;
        }
        map.end()
    }
}

// =============================================================================
// STATE AGENCIES
// =============================================================================

/// A state-level agency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct StateContact {
    pub name: &'static str,
    pub phone: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helpline: Option<&'static str>,
}

/// The four state agencies the chatbot refers citizens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateContacts {
    pub tn_water_board: StateContact,
    pub groundwater_auth: StateContact,
    pub pollution_board: StateContact,
    pub disaster_mgmt: StateContact,
}

pub const STATE_CONTACTS: StateContacts = StateContacts {
    tn_water_board: StateContact {
        name: "TN Water Supply & Drainage Board",
        phone: "044-2536-0855",
        email: None,
        helpline: Some("1916"),
    },
    groundwater_auth: StateContact {
        name: "State Groundwater Authority",
        phone: "044-2567-8900",
        email: Some("sgwa@tn.gov.in"),
        helpline: None,
    },
    pollution_board: StateContact {
        name: "TN Pollution Control Board",
        phone: "044-2235-1788",
        email: None,
        helpline: Some("1800-425-5665"),
    },
    disaster_mgmt: StateContact {
        name: "State Disaster Management",
        phone: "044-2852-1204",
        email: None,
        helpline: Some("1070"),
    },
};

/// Water board helpline quoted at the end of most chatbot replies.
pub const WATER_BOARD_HELPLINE: &str = "1916";

// =============================================================================
// TESTS
// =============================================================================
