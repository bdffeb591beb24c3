use derive_more::Display;
use phf::phf_map;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    #[display(fmt = "Aries")]
    Aries,
    #[display(fmt = "Taurus")]
    Taurus,
    #[display(fmt = "Gemini")]
    Gemini,
    #[display(fmt = "Cancer")]
    Cancer,
    #[display(fmt = "Leo")]
    Leo,
    #[display(fmt = "Virgo")]
    Virgo,
    #[display(fmt = "Libra")]
    Libra,
    #[display(fmt = "Scorpio")]
    Scorpio,
    #[display(fmt = "Sagittarius")]
    Sagittarius,
    #[display(fmt = "Capricorn")]
    Capricorn,
    #[display(fmt = "Aquarius")]
    Aquarius,
    #[display(fmt = "Pisces")]
    Pisces,
}

// month -> (first day of the later sign, sign before, sign from that day on)
static BOUNDARIES: phf::Map<u32, (u32, Sign, Sign)> = phf_map! {
    1u32 => (20, Sign::Capricorn, Sign::Aquarius),
    2u32 => (19, Sign::Aquarius, Sign::Pisces),
    3u32 => (21, Sign::Pisces, Sign::Aries),
    4u32 => (20, Sign::Aries, Sign::Taurus),
    5u32 => (21, Sign::Taurus, Sign::Gemini),
    6u32 => (21, Sign::Gemini, Sign::Cancer),
    7u32 => (23, Sign::Cancer, Sign::Leo),
    8u32 => (23, Sign::Leo, Sign::Virgo),
    9u32 => (24, Sign::Virgo, Sign::Libra),
    10u32 => (23, Sign::Libra, Sign::Scorpio),
    11u32 => (22, Sign::Scorpio, Sign::Sagittarius),
    12u32 => (22, Sign::Sagittarius, Sign::Capricorn),
};

impl Sign {
    /// Sign for a calendar month and day. `None` for an out-of-range month.
    pub fn from_month_day(month: u32, day: u32) -> Option<Sign> {
        BOUNDARIES.get(&month).map(|&(cutoff, before, from)| {
            if day >= cutoff {
                from
            } else {
                before
            }
        })
    }
}
