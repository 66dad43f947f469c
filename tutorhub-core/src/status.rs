//! Canonical booking status
//!
//! Booking producers write free-text status values (`requested`,
//! `accepted`, `completed`, `canceled`, `cancelled`, empty, mixed
//! case). Everything that filters or aggregates bookings maps the raw
//! value through one canonical 3-way partition.

/// The canonical 3-way booking status partition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalStatus {
    Active,
    Completed,
    Cancelled,
}

impl CanonicalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalStatus::Active => "active",
            CanonicalStatus::Completed => "completed",
            CanonicalStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(CanonicalStatus::Active),
            "completed" => Some(CanonicalStatus::Completed),
            "cancelled" => Some(CanonicalStatus::Cancelled),
            _ => None,
        }
    }

    /// Map a raw stored status to its canonical bucket.
    ///
    /// Matching is case-insensitive after trimming. An absent or empty
    /// status is `active`; `completed` matches exactly; any value
    /// containing `cancel` (covering both spellings) is `cancelled`;
    /// everything else (`requested`, `accepted`, unknown values) is
    /// `active`.
    pub fn from_raw(raw: Option<&str>) -> Self {
        let status = raw.unwrap_or("").trim().to_lowercase();
        if status == "completed" {
            CanonicalStatus::Completed
        } else if status.contains("cancel") {
            CanonicalStatus::Cancelled
        } else {
            CanonicalStatus::Active
        }
    }
}
