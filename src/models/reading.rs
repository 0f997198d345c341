use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PositionError;

pub const SURAH_COUNT: u32 = 114;
pub const JUZ_COUNT: u32 = 30;

/// Surah number in mushaf order, 1..=114.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SurahIndex(u8);

impl SurahIndex {
    pub fn new(n: u32) -> Result<Self, PositionError> {
        if (1..=SURAH_COUNT).contains(&n) {
            Ok(Self(n as u8))
        } else {
            Err(PositionError::SurahOutOfRange(n))
        }
    }

    pub fn get(&self) -> u32 {
        self.0 as u32
    }
}

impl TryFrom<u32> for SurahIndex {
    type Error = PositionError;
    fn try_from(n: u32) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl From<SurahIndex> for u32 {
    fn from(s: SurahIndex) -> u32 {
        s.get()
    }
}

impl std::fmt::Display for SurahIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Juz (thirtieth) number, 1..=30.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct JuzIndex(u8);

impl JuzIndex {
    pub fn new(n: u32) -> Result<Self, PositionError> {
        if (1..=JUZ_COUNT).contains(&n) {
            Ok(Self(n as u8))
        } else {
            Err(PositionError::JuzOutOfRange(n))
        }
    }

    pub fn get(&self) -> u32 {
        self.0 as u32
    }
}

impl TryFrom<u32> for JuzIndex {
    type Error = PositionError;
    fn try_from(n: u32) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl From<JuzIndex> for u32 {
    fn from(j: JuzIndex) -> u32 {
        j.get()
    }
}

impl std::fmt::Display for JuzIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ayah number within its surah, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct AyahNumber(u16);

impl AyahNumber {
    pub fn new(n: u32) -> Result<Self, PositionError> {
        if n == 0 {
            return Err(PositionError::ZeroAyah);
        }
        if n > u16::MAX as u32 {
            return Err(PositionError::AyahOutOfRange(n));
        }
        Ok(Self(n as u16))
    }

    pub fn get(&self) -> u32 {
        self.0 as u32
    }
}

impl TryFrom<u32> for AyahNumber {
    type Error = PositionError;
    fn try_from(n: u32) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl From<AyahNumber> for u32 {
    fn from(a: AyahNumber) -> u32 {
        a.get()
    }
}

impl std::fmt::Display for AyahNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where in the mushaf the reader is. Both variants carry the surah index,
/// which is the only ordering key together with the ayah.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReadingLocation {
    Surah {
        surah: SurahIndex,
        ayah: AyahNumber,
    },
    Juz {
        juz: JuzIndex,
        surah: SurahIndex,
        ayah: AyahNumber,
    },
}

impl ReadingLocation {
    pub fn surah(&self) -> SurahIndex {
        match self {
            ReadingLocation::Surah { surah, .. } | ReadingLocation::Juz { surah, .. } => *surah,
        }
    }

    pub fn ayah(&self) -> AyahNumber {
        match self {
            ReadingLocation::Surah { ayah, .. } | ReadingLocation::Juz { ayah, .. } => *ayah,
        }
    }

    pub fn juz(&self) -> Option<JuzIndex> {
        match self {
            ReadingLocation::Surah { .. } => None,
            ReadingLocation::Juz { juz, .. } => Some(*juz),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ReadingLocation::Surah { .. } => "surah",
            ReadingLocation::Juz { .. } => "juz",
        }
    }

    /// Rebuild a location from loosely typed stored columns, failing fast on
    /// anything that would make the comparison meaningless.
    pub fn from_parts(
        kind: &str,
        juz: Option<u32>,
        surah: Option<u32>,
        ayah: u32,
    ) -> Result<Self, PositionError> {
        let surah = SurahIndex::new(surah.ok_or(PositionError::MissingSurah)?)?;
        let ayah = AyahNumber::new(ayah)?;
        match kind {
            "surah" => Ok(ReadingLocation::Surah { surah, ayah }),
            "juz" => {
                let juz = JuzIndex::new(juz.ok_or(PositionError::MissingJuz)?)?;
                Ok(ReadingLocation::Juz { juz, surah, ayah })
            }
            other => Err(PositionError::UnknownKind(other.to_string())),
        }
    }
}

/// The "last read" bookmark: a location plus display data that never takes
/// part in comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingPosition {
    #[serde(flatten)]
    pub location: ReadingLocation,
    pub label: String,
    pub updated_at: DateTime<Utc>,
}

impl ReadingPosition {
    pub fn surah(
        surah: SurahIndex,
        ayah: AyahNumber,
        label: impl Into<String>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            location: ReadingLocation::Surah { surah, ayah },
            label: label.into(),
            updated_at,
        }
    }

    pub fn juz(
        juz: JuzIndex,
        surah: SurahIndex,
        ayah: AyahNumber,
        label: impl Into<String>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            location: ReadingLocation::Juz { juz, surah, ayah },
            label: label.into(),
            updated_at,
        }
    }

    pub fn surah_index(&self) -> SurahIndex {
        self.location.surah()
    }

    pub fn ayah(&self) -> AyahNumber {
        self.location.ayah()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub surah: SurahIndex,
    pub ayah: AyahNumber,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

impl Bookmark {
    pub fn new(
        surah: SurahIndex,
        ayah: AyahNumber,
        label: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Self::make_id(surah, ayah),
            surah,
            ayah,
            label: label.into(),
            created_at,
        }
    }

    pub fn make_id(surah: SurahIndex, ayah: AyahNumber) -> String {
        format!("{}_{}", surah, ayah)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_ranges() {
        assert!(SurahIndex::new(1).is_ok());
        assert!(SurahIndex::new(114).is_ok());
        assert_eq!(SurahIndex::new(0), Err(PositionError::SurahOutOfRange(0)));
        assert_eq!(SurahIndex::new(115), Err(PositionError::SurahOutOfRange(115)));
        assert_eq!(JuzIndex::new(31), Err(PositionError::JuzOutOfRange(31)));
        assert_eq!(AyahNumber::new(0), Err(PositionError::ZeroAyah));
        assert_eq!(AyahNumber::new(70_000), Err(PositionError::AyahOutOfRange(70_000)));
    }

    #[test]
    fn juz_variant_keeps_surah() {
        let loc = ReadingLocation::Juz {
            juz: JuzIndex::new(3).unwrap(),
            surah: SurahIndex::new(2).unwrap(),
            ayah: AyahNumber::new(253).unwrap(),
        };
        assert_eq!(loc.surah().get(), 2);
        assert_eq!(loc.ayah().get(), 253);
        assert_eq!(loc.juz().map(|j| j.get()), Some(3));
        assert_eq!(loc.kind(), "juz");
    }

    #[test]
    fn from_parts_fails_fast() {
        assert_eq!(
            ReadingLocation::from_parts("juz", Some(2), None, 5),
            Err(PositionError::MissingSurah)
        );
        assert_eq!(
            ReadingLocation::from_parts("juz", None, Some(2), 5),
            Err(PositionError::MissingJuz)
        );
        assert_eq!(
            ReadingLocation::from_parts("page", None, Some(2), 5),
            Err(PositionError::UnknownKind("page".into()))
        );
        assert!(matches!(
            ReadingLocation::from_parts("surah", None, Some(18), 10),
            Ok(ReadingLocation::Surah { .. })
        ));
    }

    #[test]
    fn json_is_tagged_by_kind() {
        let pos = ReadingPosition::surah(
            SurahIndex::new(18).unwrap(),
            AyahNumber::new(10).unwrap(),
            "Al-Kahf",
            DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        );
        let json = serde_json::to_value(&pos).unwrap();
        assert_eq!(json["kind"], "surah");
        assert_eq!(json["surah"], 18);
        assert_eq!(json["ayah"], 10);
    }

    #[test]
    fn json_without_surah_is_rejected() {
        let json = r#"{"kind":"juz","juz":1,"ayah":4,"label":"Juz 1","updated_at":"2024-01-01T00:00:00Z"}"#;
        assert!(serde_json::from_str::<ReadingPosition>(json).is_err());
    }

    #[test]
    fn json_out_of_range_is_rejected() {
        let json = r#"{"kind":"surah","surah":200,"ayah":4,"label":"x","updated_at":"2024-01-01T00:00:00Z"}"#;
        assert!(serde_json::from_str::<ReadingPosition>(json).is_err());
    }

    #[test]
    fn bookmark_id_format() {
        let b = Bookmark::new(
            SurahIndex::new(2).unwrap(),
            AyahNumber::new(255).unwrap(),
            "Ayat al-Kursi",
            Utc::now(),
        );
        assert_eq!(b.id, "2_255");
    }
}
