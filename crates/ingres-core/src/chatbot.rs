//! # Chatbot
//!
//! A keyword router over canned report templates. No language model, no
//! scoring: the first rule that matches the lowercased message decides the
//! reply.
//!
//! ## Routing Order
//!
//! | # | Intent | Trigger |
//! |---|--------|---------|
//! | 1 | Contact | contact, support, helpline, phone, call, municipality |
//! | 2 | Well | a well id or name |
//! | 3 | District | a district present in the dataset |
//! | 4 | Region | a region present in the dataset |
//! | 5 | TDS | tds, salinity, dissolved |
//! | 6 | Risk | risk, contamination, danger, safe, unsafe |
//! | 7 | Yield | yield, production, output, lph, liters |
//! | 8 | Overview | overview, summary, overall, report, status |
//! | 9 | Greeting | hello, hi, hey (whole words) |
//! | 10 | Thanks | thank |
//! | 11 | Help | help |
//! | 12 | Fallback | anything else |
//!
//! Reports are in English; greetings, thanks, help and the fallback are
//! localized.

use crate::contacts::{
    find_municipality, municipality_contact, MunicipalityContact, MUNICIPALITIES, STATE_CONTACTS,
    WATER_BOARD_HELPLINE,
};
use crate::i18n::{translate, Language, Phrase, Topic};
use crate::primitives::{
    REPORT_LIST_LIMIT, TDS_MODERATE_RISK, YIELD_DECLINING_BELOW, YIELD_HIGH_PERFORMER,
};
use crate::stats::{DistrictSummary, Overview};
use crate::{Dataset, IngresError, RiskLevel, WellRecord, WellStatus};
use serde::Serialize;

const CONTACT_WORDS: &[&str] = &[
    "contact",
    "support",
    "helpline",
    "phone",
    "call",
    "municipality",
    "தொடர்பு",
    "संपर्क",
    "సంప్రదింపు",
];
const TDS_WORDS: &[&str] = &["tds", "salinity", "dissolved"];
const RISK_WORDS: &[&str] = &["risk", "contamination", "danger", "safe", "unsafe"];
const YIELD_WORDS: &[&str] = &["yield", "production", "output", "lph", "liters"];
const OVERVIEW_WORDS: &[&str] = &["overview", "summary", "overall", "report", "status"];
const GREETING_TOKENS: &[&str] = &["hello", "hi", "hey"];
const GREETING_WORDS: &[&str] = &["வணக்கம்", "नमस्ते", "హలో"];
const THANKS_WORDS: &[&str] = &["thank", "நன்றி", "धन्यवाद", "ధన్యవాదాలు"];
const HELP_WORDS: &[&str] = &["help", "உதவி", "मदद", "సహాయం"];

fn mentions(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

fn mentions_token(text: &str, tokens: &[&str]) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .any(|word| tokens.contains(&word))
}

// =============================================================================
// INTENT
// =============================================================================

/// What a message is asking for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent<'a> {
    /// Contact directory, with the municipal office of a named district.
    Contact(Option<&'static str>),
    Well(&'a WellRecord),
    District(&'a str),
    Region(&'a str),
    Tds,
    Risk,
    Yield,
    Overview,
    Greeting,
    Thanks,
    Help,
    Fallback,
}

impl Intent<'_> {
    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Contact(_) => "contact",
            Self::Well(_) => "well",
            Self::District(_) => "district",
            Self::Region(_) => "region",
            Self::Tds => "tds",
            Self::Risk => "risk",
            Self::Yield => "yield",
            Self::Overview => "overview",
            Self::Greeting => "greeting",
            Self::Thanks => "thanks",
            Self::Help => "help",
            Self::Fallback => "fallback",
        }
    }
}

/// A complete chatbot answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub reply: String,
    pub suggestions: Vec<String>,
    pub language: Language,
}

// =============================================================================
// CHATBOT
// =============================================================================

/// Answers questions about one dataset.
#[derive(Debug, Clone, Copy)]
pub struct Chatbot<'a> {
    data: &'a Dataset,
}

impl<'a> Chatbot<'a> {
    #[must_use]
    pub fn new(data: &'a Dataset) -> Self {
        Self { data }
    }

    /// Answer `message`, in `language` when given, else in the detected one.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when the message is blank.
    pub fn respond(
        &self,
        message: &str,
        language: Option<Language>,
    ) -> Result<ChatReply, IngresError> {
        if message.trim().is_empty() {
            return Err(IngresError::InvalidInput("Message is required".to_string()));
        }
        let language = language.unwrap_or_else(|| Language::detect(message));
        Ok(ChatReply {
            reply: self.reply(message, language),
            suggestions: Self::suggestions(message, language),
            language,
        })
    }

    /// Route `message` to a reply text.
    #[must_use]
    pub fn reply(&self, message: &str, language: Language) -> String {
        let text = message.to_lowercase();
        let intent = self.classify(&text);
        tracing::debug!(intent = intent.name(), language = %language, "routed chat message");

        match intent {
            Intent::Contact(district) => contact_reply(district, language),
            Intent::Well(well) => well_card(well),
            Intent::District(district) => {
                let wells = self.data.in_district(district);
                group_report(&format!("{} District", district), district, district, &wells)
            }
            Intent::Region(region) => {
                let wells = self.data.in_region(region);
                let district = wells.first().map_or("", |w| w.district.as_str());
                group_report(&region_title(region), region, district, &wells)
            }
            Intent::Tds => tds_report(self.data.records()),
            Intent::Risk => risk_report(self.data.records()),
            Intent::Yield => yield_report(self.data.records()),
            Intent::Overview => overview_report(self.data.records()),
            Intent::Greeting => {
                let count = self.data.len().to_string();
                format!(
                    "{}\n\n{}\n\n{}",
                    translate(language, Phrase::Greeting, &[]),
                    translate(language, Phrase::DataLoaded, &[("count", &count)]),
                    translate(language, Phrase::AskAbout, &[]),
                )
            }
            Intent::Thanks => translate(language, Phrase::Thanks, &[]),
            Intent::Help => {
                let topics: Vec<String> = language
                    .help_topics()
                    .iter()
                    .map(|t| format!("• {}", t))
                    .collect();
                format!(
                    "{}\n\n{}\n\n📞 **Quick Support:** {}",
                    translate(language, Phrase::Help, &[]),
                    topics.join("\n"),
                    WATER_BOARD_HELPLINE,
                )
            }
            Intent::Fallback => format!(
                "{}\n\n{}\n\n📞 **Need Help?** Call {}",
                translate(language, Phrase::NotSure, &[]),
                translate(language, Phrase::TryAsking, &[]),
                WATER_BOARD_HELPLINE,
            ),
        }
    }

    /// Decide the intent of an already lowercased message.
    #[must_use]
    pub fn classify(&self, text: &str) -> Intent<'a> {
        let data = self.data;

        if mentions(text, CONTACT_WORDS) {
            return Intent::Contact(mentioned_municipality(data, text));
        }
        if let Some(well) = data.mentioned_well(text) {
            return Intent::Well(well);
        }
        if let Some(district) = data.mentioned_district(text) {
            return Intent::District(district);
        }
        if let Some(region) = data.mentioned_region(text) {
            return Intent::Region(region);
        }
        if mentions(text, TDS_WORDS) {
            Intent::Tds
        } else if mentions(text, RISK_WORDS) {
            Intent::Risk
        } else if mentions(text, YIELD_WORDS) {
            Intent::Yield
        } else if mentions(text, OVERVIEW_WORDS) {
            Intent::Overview
        } else if mentions_token(text, GREETING_TOKENS) || mentions(text, GREETING_WORDS) {
            Intent::Greeting
        } else if mentions(text, THANKS_WORDS) {
            Intent::Thanks
        } else if mentions(text, HELP_WORDS) {
            Intent::Help
        } else {
            Intent::Fallback
        }
    }

    /// Follow-up prompts for the topic of `message`.
    #[must_use]
    pub fn suggestions(message: &str, language: Language) -> Vec<String> {
        let text = message.to_lowercase();
        let topic = if mentions(&text, &["tds", "quality"]) {
            Topic::Tds
        } else if mentions(&text, &["risk", "contamination"]) {
            Topic::Risk
        } else if mentions(&text, &["yield", "production"]) {
            Topic::Yield
        } else if mentions(&text, &["district", "region"]) {
            Topic::District
        } else if mentions(&text, &["contact", "support"]) {
            Topic::Contact
        } else {
            Topic::General
        };
        language
            .suggestions(topic)
            .iter()
            .map(|s| (*s).to_string())
            .collect()
    }
}

/// District with a directory entry named in `text`; dataset districts first.
fn mentioned_municipality(data: &Dataset, text: &str) -> Option<&'static str> {
    data.mentioned_district(text)
        .and_then(find_municipality)
        .map(|(name, _)| name)
        .or_else(|| {
            MUNICIPALITIES
                .iter()
                .map(|(name, _)| *name)
                .find(|name| text.contains(&name.to_lowercase()))
        })
}

// =============================================================================
// TEMPLATES
// =============================================================================

fn local_support(lines: &mut Vec<String>, heading: String, contact: &MunicipalityContact) {
    lines.push(String::new());
    lines.push(heading);
    lines.push(format!("   • Office: {}", contact.office));
    lines.push(format!("   • Phone: {}", contact.phone));
    lines.push(format!("   • Helpline: {}", contact.helpline));
}

fn risk_dot(risk: RiskLevel) -> &'static str {
    match risk {
        RiskLevel::High => "🔴",
        RiskLevel::Moderate => "🟡",
        RiskLevel::Low => "🟢",
    }
}

fn well_card(site: &WellRecord) -> String {
    let risk = site.risk();
    let risk_emoji = match risk {
        RiskLevel::High => "⚠️",
        RiskLevel::Moderate => "🟡",
        RiskLevel::Low => "✅",
    };
    let status_emoji = if site.status == WellStatus::Maintenance {
        "🔧"
    } else {
        "🟢"
    };
    let survey = if site.last_inspection.is_empty() {
        "N/A"
    } else {
        site.last_inspection.as_str()
    };

    let mut lines = vec![
        format!("📍 **{}**", site.name),
        format!("   {}, {}", site.district, site.region),
        String::new(),
        "📊 **Water Quality:**".to_string(),
        format!("   • TDS: {} mg/L", site.tds_level),
        format!("   • pH: {}", site.ph),
        format!("   • Conductivity: {} µS/cm", site.conductivity),
        String::new(),
        "💧 **Well Information:**".to_string(),
        format!("   • Water Level: {}m", site.water_level_meters),
        format!("   • Depth: {}m", site.depth_meters),
        format!("   • Yield: {} LPH", site.yield_lph),
        String::new(),
        "📈 **Status:**".to_string(),
        format!("   • Risk Level: {} {}", risk, risk_emoji),
        format!("   • Trend: {}", site.trend()),
        format!("   • Status: {} {}", site.status, status_emoji),
        format!("   • Last Survey: {}", survey),
    ];

    if !site.notes.is_empty() {
        lines.push(String::new());
        lines.push(format!("📝 **Notes:** {}", site.notes));
    }

    local_support(
        &mut lines,
        format!("📞 **Local Support ({}):**", site.district),
        &municipality_contact(&site.district),
    );
    lines.join("\n")
}

/// `Kongu Region` stays as is; `Cauvery Delta` becomes `Cauvery Delta Region`.
fn region_title(region: &str) -> String {
    if region.to_lowercase().ends_with("region") {
        region.to_string()
    } else {
        format!("{} Region", region)
    }
}

fn group_report(title: &str, name: &str, district: &str, wells: &[&WellRecord]) -> String {
    let summary = DistrictSummary::from_wells(wells);

    let mut lines = vec![
        format!("📍 **{} Report**", title),
        String::new(),
        "📊 **Statistics:**".to_string(),
        format!("   • Total Wells: {}", summary.count),
        format!("   • Average TDS: {:.0} mg/L", summary.avg_tds),
        format!("   • Average Yield: {:.0} LPH", summary.avg_yield),
        format!("   • High Risk Wells: {}", summary.high_risk),
        String::new(),
        format!("🔍 **Wells in {}:**", name),
    ];

    for site in wells.iter().take(REPORT_LIST_LIMIT) {
        lines.push(format!(
            "   {} {} - TDS: {}, Yield: {} LPH",
            risk_dot(site.risk()),
            site.name,
            site.tds_level,
            site.yield_lph
        ));
    }
    if wells.len() > REPORT_LIST_LIMIT {
        lines.push(format!(
            "   ... and {} more wells",
            wells.len() - REPORT_LIST_LIMIT
        ));
    }

    local_support(
        &mut lines,
        "📞 **Local Support:**".to_string(),
        &municipality_contact(district),
    );
    lines.join("\n")
}

fn overview_report(records: &[WellRecord]) -> String {
    let s = Overview::from_records(records);
    let state = STATE_CONTACTS;

    [
        "📊 **Groundwater Overview**".to_string(),
        String::new(),
        "🔢 **Network Statistics:**".to_string(),
        format!("   • Total Wells: {}", s.total_sites),
        format!("   • Active: {}", s.active_sites),
        format!("   • Under Maintenance: {}", s.maintenance_sites),
        format!("   • Districts Covered: {}", s.districts.len()),
        String::new(),
        "💧 **Water Quality:**".to_string(),
        format!("   • Average TDS: {} mg/L", s.avg_tds),
        format!("   • Average pH: {}", s.avg_ph),
        format!("   • Average Yield: {} LPH", s.avg_yield),
        String::new(),
        "⚠️ **Risk Assessment:**".to_string(),
        format!("   • High Risk: {} wells", s.high_risk_sites),
        format!("   • Moderate Risk: {} wells", s.moderate_risk_sites),
        format!("   • Safe (TDS < 500): {} wells", s.safe_sites),
        String::new(),
        "📈 **Recharge Trends:**".to_string(),
        format!("   • Rising: {}", s.rising_sites),
        format!("   • Stable: {}", s.stable_sites),
        format!("   • Declining: {}", s.declining_sites),
        String::new(),
        format!(
            "📅 **Last Survey:** {}",
            s.latest_inspection.as_deref().unwrap_or("N/A")
        ),
        String::new(),
        "📞 **State Helplines:**".to_string(),
        format!(
            "   • Water Board: {}",
            state.tn_water_board.helpline.unwrap_or_default()
        ),
        format!("   • Groundwater Authority: {}", state.groundwater_auth.phone),
        format!(
            "   • Pollution Control: {}",
            state.pollution_board.helpline.unwrap_or_default()
        ),
    ]
    .join("\n")
}

fn tds_report(records: &[WellRecord]) -> String {
    let s = Overview::from_records(records);

    let mut lines = vec![
        "💧 **TDS Analysis**".to_string(),
        String::new(),
        "📊 **Overall Statistics:**".to_string(),
        format!("   • Average TDS: {} mg/L", s.avg_tds),
        format!(
            "   • Safe Wells (< 500 mg/L): {} of {}",
            s.safe_sites, s.total_sites
        ),
        format!("   • Safety Rate: {:.1}%", s.safety_rate_percent()),
    ];

    let high: Vec<&WellRecord> = records
        .iter()
        .filter(|r| r.tds_level >= TDS_MODERATE_RISK)
        .take(REPORT_LIST_LIMIT)
        .collect();
    if !high.is_empty() {
        lines.push(String::new());
        lines.push("⚠️ **High TDS Wells (≥ 500 mg/L):**".to_string());
        for site in high {
            lines.push(format!(
                "   • {}: {} mg/L ({})",
                site.name, site.tds_level, site.district
            ));
        }
    }

    lines.extend([
        String::new(),
        "ℹ️ **TDS Guidelines:**".to_string(),
        "   • < 300 mg/L: Excellent".to_string(),
        "   • 300-500 mg/L: Good".to_string(),
        "   • 500-900 mg/L: Fair".to_string(),
        "   • > 900 mg/L: Poor".to_string(),
        String::new(),
        format!("📞 **Report Issues:** {}", WATER_BOARD_HELPLINE),
    ]);
    lines.join("\n")
}

fn risk_report(records: &[WellRecord]) -> String {
    let s = Overview::from_records(records);

    let mut lines = vec![
        "⚠️ **Risk Assessment Report**".to_string(),
        String::new(),
        "📊 **Risk Distribution:**".to_string(),
        format!("   • 🔴 High Risk: {} wells", s.high_risk_sites),
        format!("   • 🟡 Moderate Risk: {} wells", s.moderate_risk_sites),
        format!("   • 🟢 Low Risk: {} wells", s.low_risk_sites()),
        String::new(),
        format!("✅ **Safe Wells (TDS < 500):** {}", s.safe_sites),
    ];

    let high: Vec<&WellRecord> = records
        .iter()
        .filter(|r| r.risk() == RiskLevel::High)
        .take(REPORT_LIST_LIMIT)
        .collect();
    if !high.is_empty() {
        lines.push(String::new());
        lines.push("🚨 **High Risk Wells:**".to_string());
        for site in high {
            let contact = municipality_contact(&site.district);
            lines.push(format!("   • {}", site.name));
            lines.push(format!("     District: {}", site.district));
            lines.push(format!("     TDS: {} mg/L", site.tds_level));
            lines.push(format!("     Contact: {}", contact.helpline));
        }
    }

    lines.extend([
        String::new(),
        "📞 **Emergency Contacts:**".to_string(),
        format!("   • Water Board: {}", WATER_BOARD_HELPLINE),
        format!(
            "   • Pollution Board: {}",
            STATE_CONTACTS.pollution_board.helpline.unwrap_or_default()
        ),
    ]);
    lines.join("\n")
}

fn yield_report(records: &[WellRecord]) -> String {
    let s = Overview::from_records(records);
    let high: Vec<&WellRecord> = records
        .iter()
        .filter(|r| r.yield_lph >= YIELD_HIGH_PERFORMER)
        .collect();
    let low: Vec<&WellRecord> = records
        .iter()
        .filter(|r| r.yield_lph < YIELD_DECLINING_BELOW)
        .collect();

    let mut lines = vec![
        "💧 **Yield Analysis**".to_string(),
        String::new(),
        "📊 **Statistics:**".to_string(),
        format!("   • Average Yield: {} LPH", s.avg_yield),
        format!("   • High Yield (≥1800 LPH): {} wells", high.len()),
        format!("   • Low Yield (<1000 LPH): {} wells", low.len()),
    ];

    for (heading, wells) in [
        ("🏆 **Top Performers:**", &high),
        ("⚠️ **Low Yield Wells (Need Attention):**", &low),
    ] {
        if wells.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(heading.to_string());
        for site in wells.iter().take(REPORT_LIST_LIMIT) {
            lines.push(format!(
                "   • {}: {} LPH ({})",
                site.name, site.yield_lph, site.district
            ));
        }
    }
    lines.join("\n")
}

/// Headings follow `language`; agency details stay as published.
fn contact_reply(district: Option<&'static str>, language: Language) -> String {
    let state = STATE_CONTACTS;
    let mut lines = vec![
        format!("📞 **{}**", translate(language, Phrase::ContactSupport, &[])),
        String::new(),
    ];

    if let Some((name, contact)) = district.and_then(find_municipality) {
        lines.extend([
            format!(
                "🏛️ **{}: {}**",
                translate(language, Phrase::MunicipalityInfo, &[]),
                name
            ),
            format!("   • Office: {}", contact.office),
            format!("   • Phone: {}", contact.phone),
            format!("   • Email: {}", contact.email),
            format!("   • Helpline: {}", contact.helpline),
            String::new(),
        ]);
    }

    lines.extend([
        format!(
            "🏛️ **{}:**",
            translate(language, Phrase::StateHelplines, &[])
        ),
        String::new(),
        format!("💧 **{}:**", state.tn_water_board.name),
        format!(
            "   • Helpline: {}",
            state.tn_water_board.helpline.unwrap_or_default()
        ),
        format!("   • Phone: {}", state.tn_water_board.phone),
        String::new(),
        format!("🌊 **{}:**", state.groundwater_auth.name),
        format!("   • Phone: {}", state.groundwater_auth.phone),
        format!(
            "   • Email: {}",
            state.groundwater_auth.email.unwrap_or_default()
        ),
        String::new(),
        format!("🏭 **{}:**", state.pollution_board.name),
        format!(
            "   • Helpline: {}",
            state.pollution_board.helpline.unwrap_or_default()
        ),
        format!("   • Phone: {}", state.pollution_board.phone),
        String::new(),
        "🚨 **Disaster Management:**".to_string(),
        format!(
            "   • Emergency: {}",
            state.disaster_mgmt.helpline.unwrap_or_default()
        ),
        format!("   • Phone: {}", state.disaster_mgmt.phone),
    ]);
    lines.join("\n")
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn well(id: &str, name: &str, district: &str, tds: f64, yield_lph: f64) -> WellRecord {
        let mut r = WellRecord::new(id);
        r.name = name.to_string();
        r.district = district.to_string();
        r.region = "Cauvery Delta".to_string();
        r.tds_level = tds;
        r.yield_lph = yield_lph;
        r.water_level_meters = 8.0;
        r.last_inspection = "2024-03-01".to_string();
        r.with_derived_labels()
    }

    fn data() -> Dataset {
        Dataset::new(vec![
            well("TN-THA-001", "Thanjavur Well 1", "Thanjavur", 650.0, 900.0),
            well("TN-THA-002", "Thanjavur Well 2", "Thanjavur", 420.0, 2100.0),
            well("TN-THI-001", "Thiruvarur Well 1", "Thiruvarur", 510.0, 1500.0),
        ])
    }

    #[test]
    fn blank_message_is_rejected() {
        let data = data();
        let err = Chatbot::new(&data).respond("   ", None).unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: Message is required");
    }

    #[test]
    fn contact_beats_well_mention() {
        let data = data();
        let bot = Chatbot::new(&data);
        let intent = bot.classify("phone number for thanjavur well 1");
        assert_eq!(intent, Intent::Contact(Some("Thanjavur")));

        let reply = bot.reply("phone number for thanjavur", Language::En);
        assert!(reply.starts_with("📞 **Contact Support**"));
        assert!(reply.contains("🏛️ **Municipality Contact: Thanjavur**"));
        assert!(reply.contains("Thanjavur Municipal Corporation"));
    }

    #[test]
    fn contact_without_district_lists_state_agencies() {
        let data = data();
        let reply = Chatbot::new(&data).reply("support please", Language::En);
        assert!(!reply.contains("Municipality Contact"));
        assert!(reply.contains("🏛️ **State Helplines:**"));
        assert!(reply.contains("sgwa@tn.gov.in"));
        assert!(reply.contains("Emergency: 1070"));
    }

    #[test]
    fn contact_headings_follow_language() {
        let data = data();
        let reply = Chatbot::new(&data).reply("thanjavur contact", Language::Ta);
        assert!(reply.starts_with("📞 **தொடர்பு ஆதரவு**"));
        assert!(reply.contains("🏛️ **நகராட்சி தொடர்பு: Thanjavur**"));
        assert!(reply.contains("🏛️ **மாநில உதவி எண்கள்:**"));
        assert!(!reply.contains("Contact Support"));
    }

    #[test]
    fn well_card() {
        let data = data();
        let reply = Chatbot::new(&data).reply("tell me about TN-THA-001", Language::En);
        assert!(reply.starts_with("📍 **Thanjavur Well 1**"));
        assert!(reply.contains("Risk Level: High ⚠️"));
        assert!(reply.contains("Trend: Declining"));
        assert!(reply.contains("Local Support (Thanjavur)"));
    }

    #[test]
    fn district_report_summarises() {
        let data = data();
        let reply = Chatbot::new(&data).reply("how is thanjavur", Language::En);
        assert!(reply.starts_with("📍 **Thanjavur District Report**"));
        assert!(reply.contains("Total Wells: 2"));
        assert!(reply.contains("Average TDS: 535 mg/L"));
        assert!(reply.contains("🔴 Thanjavur Well 1 - TDS: 650, Yield: 900 LPH"));
    }

    #[test]
    fn region_report() {
        let data = data();
        let reply = Chatbot::new(&data).reply("cauvery delta", Language::En);
        assert!(reply.starts_with("📍 **Cauvery Delta Region Report**"));
        assert!(reply.contains("Total Wells: 3"));
    }

    #[test]
    fn region_already_named_region_keeps_one_suffix() {
        let mut kongu = well("TN-ERO-001", "Erode Well 1", "Erode", 430.0, 1600.0);
        kongu.region = "Kongu Region".to_string();
        let data = Dataset::new(vec![kongu]);

        let reply = Chatbot::new(&data).reply("kongu region wells", Language::En);
        assert!(reply.starts_with("📍 **Kongu Region Report**"));
        assert!(reply.contains("🔍 **Wells in Kongu Region:**"));
        assert_eq!(region_title("Cauvery Delta"), "Cauvery Delta Region");
    }

    #[test]
    fn keyword_routes() {
        let data = data();
        let bot = Chatbot::new(&data);
        assert_eq!(bot.classify("salinity levels"), Intent::Tds);
        assert_eq!(bot.classify("is it safe"), Intent::Risk);
        assert_eq!(bot.classify("yield numbers"), Intent::Yield);
        assert_eq!(bot.classify("give me a summary"), Intent::Overview);
        assert_eq!(bot.classify("hey!"), Intent::Greeting);
        assert_eq!(bot.classify("thanks a lot"), Intent::Thanks);
        assert_eq!(bot.classify("help"), Intent::Help);
        assert_eq!(bot.classify("what is this"), Intent::Fallback);
    }

    #[test]
    fn greeting_is_localized() {
        let data = data();
        let reply = Chatbot::new(&data).respond("வணக்கம்", None).unwrap();
        assert_eq!(reply.language, Language::Ta);
        assert!(reply.reply.contains("3 கிணறுகளின்"));
        assert_eq!(reply.suggestions[0], "கண்ணோட்டம்");
    }

    #[test]
    fn tds_report_on_empty_dataset() {
        let data = Dataset::default();
        let reply = Chatbot::new(&data).reply("tds", Language::En);
        assert!(reply.contains("Safety Rate: 0.0%"));
        assert!(!reply.contains("High TDS Wells"));
    }

    #[test]
    fn yield_report_lists_both_ends() {
        let data = data();
        let reply = Chatbot::new(&data).reply("production", Language::En);
        assert!(reply.contains("High Yield (≥1800 LPH): 1 wells"));
        assert!(reply.contains("Thanjavur Well 2: 2100 LPH (Thanjavur)"));
        assert!(reply.contains("Thanjavur Well 1: 900 LPH (Thanjavur)"));
    }

    #[test]
    fn suggestions_follow_topic() {
        assert_eq!(
            Chatbot::suggestions("water quality", Language::En)[0],
            "Show high-risk sites"
        );
        assert_eq!(
            Chatbot::suggestions("contamination", Language::En)[0],
            "TDS breakdown"
        );
        assert_eq!(Chatbot::suggestions("hmm", Language::Hi).len(), 5);
    }
}
