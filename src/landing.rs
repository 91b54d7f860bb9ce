//! Landing page outline: section anchors, navbar menu and pricing tiers.

use serde::Serialize;

/// Page sections in scroll order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    Hero,
    Pain,
    Solution,
    RobotHuman,
    Flow,
    Pilot,
    Metrics,
    Faq,
    Pricing,
    Testimonials,
    Cta,
    Contact,
}

impl Section {
    pub const ALL: [Section; 12] = [
        Section::Hero,
        Section::Pain,
        Section::Solution,
        Section::RobotHuman,
        Section::Flow,
        Section::Pilot,
        Section::Metrics,
        Section::Faq,
        Section::Pricing,
        Section::Testimonials,
        Section::Cta,
        Section::Contact,
    ];

    /// Element id used as the scroll target.
    pub fn anchor(&self) -> &'static str {
        match self {
            Section::Hero => "hero",
            Section::Pain => "pain",
            Section::Solution => "solution",
            Section::RobotHuman => "robot-human",
            Section::Flow => "flow",
            Section::Pilot => "pilot",
            Section::Metrics => "metrics",
            Section::Faq => "faq",
            Section::Pricing => "pricing",
            Section::Testimonials => "testimonials",
            Section::Cta => "cta",
            Section::Contact => "contact",
        }
    }

    pub fn from_anchor(anchor: &str) -> Option<Section> {
        Self::ALL.iter().copied().find(|s| s.anchor() == anchor)
    }
}

/// Navbar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub target: Section,
}

const NAV_ITEMS: [NavItem; 5] = [
    NavItem {
        label: "הבעיה",
        target: Section::Pain,
    },
    NavItem {
        label: "הפתרון",
        target: Section::Solution,
    },
    NavItem {
        label: "הפיילוט",
        target: Section::Pilot,
    },
    NavItem {
        label: "השקעה",
        target: Section::Pricing,
    },
    NavItem {
        label: "קביעת פגישה",
        target: Section::Cta,
    },
];

/// Mobile navbar menu.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NavMenu {
    pub open: bool,
}

impl NavMenu {
    pub fn items(&self) -> &'static [NavItem] {
        &NAV_ITEMS
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Navigate to `section`: closes the menu and returns the anchor to
    /// scroll into view.
    pub fn scroll_to(&mut self, section: Section) -> &'static str {
        self.open = false;
        section.anchor()
    }
}

/// How a tier is billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PriceMode {
    OneTime,
    Monthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PricingTier {
    pub name: &'static str,
    pub min_ils: u32,
    pub max_ils: u32,
    pub mode: PriceMode,
    pub blurb: &'static str,
}

impl PricingTier {
    pub fn price_label(&self) -> String {
        format!("₪{}–₪{}", group_thousands(self.min_ils), group_thousands(self.max_ils))
    }
}

const TIERS: [PricingTier; 3] = [
    PricingTier {
        name: "פיילוט",
        min_ils: 3_500,
        max_ils: 5_000,
        mode: PriceMode::OneTime,
        blurb: "התחלה ממוקדת, תוצאות תוך 14 יום",
    },
    PricingTier {
        name: "מערכת מתקדמת",
        min_ils: 8_000,
        max_ils: 15_000,
        mode: PriceMode::OneTime,
        blurb: "פתרון מלא לאחר פיילוט מוצלח",
    },
    PricingTier {
        name: "ליווי חודשי",
        min_ils: 500,
        max_ils: 1_500,
        mode: PriceMode::Monthly,
        blurb: "עדכונים ותחזוקה, שירות שוטף",
    },
];

/// Tiers for a price mode; `None` shows all of them.
pub fn pricing_tiers(mode: Option<PriceMode>) -> Vec<PricingTier> {
    TIERS
        .iter()
        .copied()
        .filter(|t| mode.map_or(true, |m| t.mode == m))
        .collect()
}

fn group_thousands(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_to_closes_menu() {
        let mut menu = NavMenu::default();
        menu.toggle();
        assert!(menu.open);
        assert_eq!(menu.scroll_to(Section::Pricing), "pricing");
        assert!(!menu.open);
    }

    #[test]
    fn test_nav_targets_are_sections() {
        let menu = NavMenu::default();
        let anchors: Vec<&str> = menu.items().iter().map(|i| i.target.anchor()).collect();
        assert_eq!(anchors, vec!["pain", "solution", "pilot", "pricing", "cta"]);
    }

    #[test]
    fn test_anchor_lookup() {
        assert_eq!(Section::from_anchor("robot-human"), Some(Section::RobotHuman));
        assert_eq!(Section::from_anchor("nope"), None);
    }

    #[test]
    fn test_price_mode_filter_and_labels() {
        assert_eq!(pricing_tiers(None).len(), 3);
        let monthly = pricing_tiers(Some(PriceMode::Monthly));
        assert_eq!(monthly.len(), 1);
        assert_eq!(monthly[0].price_label(), "₪500–₪1,500");
        assert_eq!(pricing_tiers(Some(PriceMode::OneTime))[1].price_label(), "₪8,000–₪15,000");
    }
}
