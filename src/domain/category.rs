// EPA severity bands and their display colors
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Good,
    Moderate,
    UnhealthySensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl Category {
    pub fn from_aqi(aqi: u16) -> Self {
        match aqi {
            0..=50 => Category::Good,
            51..=100 => Category::Moderate,
            101..=150 => Category::UnhealthySensitive,
            151..=200 => Category::Unhealthy,
            201..=300 => Category::VeryUnhealthy,
            _ => Category::Hazardous,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Good => "Good",
            Category::Moderate => "Moderate",
            Category::UnhealthySensitive => "Unhealthy for Sensitive Groups",
            Category::Unhealthy => "Unhealthy",
            Category::VeryUnhealthy => "Very Unhealthy",
            Category::Hazardous => "Hazardous",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Category::Good => "#009966",
            Category::Moderate => "#FFDE33",
            Category::UnhealthySensitive => "#FF9933",
            Category::Unhealthy => "#CC0033",
            Category::VeryUnhealthy => "#660099",
            Category::Hazardous => "#7E0023",
        }
    }

    pub fn badge(&self) -> Badge {
        Badge {
            label: self.label(),
            color: self.color(),
        }
    }
}

/// Viewer-facing label and color for the AQI tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Badge {
    #[serde(rename = "category")]
    pub label: &'static str,
    pub color: &'static str,
}

impl Badge {
    /// Shown in place of the real category when the viewer may not see the AQI tile.
    pub const HIDDEN: Badge = Badge {
        label: "Hidden",
        color: "#999999",
    };
}

/// Category label and color for an AQI value.
pub fn aqi_category(aqi: u16) -> Badge {
    Category::from_aqi(aqi).badge()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_thresholds() {
        assert_eq!(Category::from_aqi(0), Category::Good);
        assert_eq!(Category::from_aqi(50), Category::Good);
        assert_eq!(Category::from_aqi(51), Category::Moderate);
        assert_eq!(Category::from_aqi(100), Category::Moderate);
        assert_eq!(Category::from_aqi(101), Category::UnhealthySensitive);
        assert_eq!(Category::from_aqi(150), Category::UnhealthySensitive);
        assert_eq!(Category::from_aqi(151), Category::Unhealthy);
        assert_eq!(Category::from_aqi(200), Category::Unhealthy);
        assert_eq!(Category::from_aqi(201), Category::VeryUnhealthy);
        assert_eq!(Category::from_aqi(300), Category::VeryUnhealthy);
        assert_eq!(Category::from_aqi(301), Category::Hazardous);
        assert_eq!(Category::from_aqi(999), Category::Hazardous);
    }

    #[test]
    fn test_zero_is_good() {
        let badge = aqi_category(0);
        assert_eq!(badge.label, "Good");
        assert_eq!(badge.color, "#009966");
    }

    #[test]
    fn test_badge_colors() {
        assert_eq!(aqi_category(120).color, "#FF9933");
        assert_eq!(aqi_category(250).label, "Very Unhealthy");
        assert_eq!(aqi_category(400).color, "#7E0023");
    }
}
