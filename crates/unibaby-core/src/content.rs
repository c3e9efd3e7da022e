//! Static storefront content: trainers, features, contacts, opening hours.

use chrono::{Datelike, NaiveTime};

pub const SITE_NAME: &str = "UniBaby Pool";

pub const HERO_TITLE: &str = "UniBaby Children's Pool";
pub const HERO_TEXT: &str = "Professional swimming lessons for children from 0 to 12 years old. \
Safety, comfort and an individual approach to every child.";

pub const TAGLINE: &str = "A children's pool with a professional approach to swimming lessons";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trainer {
    pub name: &'static str,
    pub specialty: &'static str,
    pub experience_years: u8,
}

impl Trainer {
    pub fn experience(&self) -> String {
        format!("{} years of experience", self.experience_years)
    }
}

pub const TRAINER_RATING: &str = "★★★★★ 5.0";

pub const TRAINERS: [Trainer; 3] = [
    Trainer {
        name: "Anna Petrovna",
        specialty: "Swimming instructor for toddlers",
        experience_years: 8,
    },
    Trainer {
        name: "Sergey Ivanovich",
        specialty: "Competitive swimming coach",
        experience_years: 12,
    },
    Trainer {
        name: "Maria Alexandrovna",
        specialty: "Aqua aerobics for children",
        experience_years: 6,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
}

pub const FEATURES: [Feature; 3] = [
    Feature {
        title: "Professional trainers",
        description: "Certified instructors with years of experience working with children",
    },
    Feature {
        title: "Safety first",
        description: "Modern equipment and constant supervision of every child",
    },
    Feature {
        title: "Individual approach",
        description: "Programs adapted to each age group",
    },
];

/// Listed under every package card
pub const PACKAGE_PERKS: [&str; 4] = [
    "Professional trainer",
    "Modern equipment",
    "Individual approach",
    "Certificate after the course",
];

pub const ADDRESS: &str = "Almaty, Primernaya st. 123";
pub const PHONE: &str = "+7 (701) 123-45-67";
pub const EMAIL: &str = "info@unibaby-pool.kz";
pub const INSTAGRAM_URL: &str = "https://www.instagram.com/unibaby_uniflex";

pub const MAP_LAT: f64 = 43.238293;
pub const MAP_LON: f64 = 76.889311;

/// Opening hours, every day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpeningHours {
    pub opens: NaiveTime,
    pub closes: NaiveTime,
}

impl OpeningHours {
    pub fn daily() -> Self {
        Self {
            opens: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
            closes: NaiveTime::from_hms_opt(21, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }

    /// Closing time is exclusive
    pub fn is_open_at(&self, time: NaiveTime) -> bool {
        time >= self.opens && time < self.closes
    }

    pub fn display(&self) -> String {
        format!("Daily: {} - {}", self.opens.format("%H:%M"), self.closes.format("%H:%M"))
    }
}

/// 2GIS link centered on the pool
pub fn map_url() -> String {
    format!("https://2gis.kz/almaty/geo/{},{}", MAP_LON, MAP_LAT)
}

pub fn copyright<D: Datelike>(today: &D) -> String {
    format!("© {} {}. All rights reserved.", today.year(), SITE_NAME)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_opening_hours() {
        let hours = OpeningHours::daily();
        assert!(!hours.is_open_at(at(7, 59)));
        assert!(hours.is_open_at(at(8, 0)));
        assert!(hours.is_open_at(at(20, 59)));
        assert!(!hours.is_open_at(at(21, 0)));
        assert_eq!(hours.display(), "Daily: 08:00 - 21:00");
    }

    #[test]
    fn test_trainer_experience() {
        assert_eq!(TRAINERS[1].experience(), "12 years of experience");
    }

    #[test]
    fn test_copyright_uses_given_year() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert_eq!(copyright(&date), "© 2026 UniBaby Pool. All rights reserved.");
    }

    #[test]
    fn test_map_url() {
        assert_eq!(map_url(), "https://2gis.kz/almaty/geo/76.889311,43.238293");
    }
}
