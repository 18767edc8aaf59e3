//! Medication data model.
//!
//! These types are serialized to the JSON store as-is. Values typed by the
//! user arrive as strings in a [`MedicationDraft`] and are converted and
//! checked in one place before a [`Medication`] exists.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DatabaseError, Result};

/// Date format accepted for expiration dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Period of the day a dose belongs to.
///
/// # Examples
///
/// ```
/// use medtrack_db::TimeOfDay;
///
/// assert_eq!(TimeOfDay::from_hour(9, 12, 18), TimeOfDay::Morning);
/// assert_eq!(TimeOfDay::from_hour(12, 12, 18), TimeOfDay::Afternoon);
/// assert_eq!(TimeOfDay::from_hour(21, 12, 18), TimeOfDay::Evening);
/// assert_eq!(TimeOfDay::Evening.to_string(), "evening");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    /// Before the morning cut-off hour.
    Morning,
    /// Between the morning and afternoon cut-off hours.
    Afternoon,
    /// From the afternoon cut-off hour on.
    Evening,
}

impl TimeOfDay {
    /// All periods in chronological order.
    pub const ALL: [TimeOfDay; 3] = [Self::Morning, Self::Afternoon, Self::Evening];

    /// Classifies an hour of the day (0-23).
    pub fn from_hour(hour: u32, morning_end: u32, afternoon_end: u32) -> Self {
        if hour < morning_end {
            Self::Morning
        } else if hour < afternoon_end {
            Self::Afternoon
        } else {
            Self::Evening
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
        })
    }
}

/// A medication tracked by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    /// Display name, unique ignoring case.
    pub name: String,
    /// Amount in stock.
    pub quantity: f64,
    /// Morning dosage, if any.
    pub dosage_morning: Option<f64>,
    /// Afternoon dosage, if any.
    pub dosage_afternoon: Option<f64>,
    /// Evening dosage, if any.
    pub dosage_evening: Option<f64>,
    /// Last day the medication may be taken.
    pub expiration: NaiveDate,
    /// Free-form remarks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    /// Repeat cadence in days (1 = daily).
    pub repeat: u32,
    /// Day the medication was added; repeats count from here.
    pub day_added: NaiveDate,
    /// Illness treated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub illness: Option<String>,
    /// Known side effects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_effects: Option<String>,
    /// Allergies to watch for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
}

impl Medication {
    /// Dosage for a period, if one is set.
    pub fn dosage(&self, period: TimeOfDay) -> Option<f64> {
        match period {
            TimeOfDay::Morning => self.dosage_morning,
            TimeOfDay::Afternoon => self.dosage_afternoon,
            TimeOfDay::Evening => self.dosage_evening,
        }
    }

    /// Returns `true` if the medication is scheduled on `date`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use medtrack_db::MedicationDraft;
    ///
    /// let added = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    /// let medication = MedicationDraft {
    ///     name: Some("Iron".into()),
    ///     quantity: Some("20".into()),
    ///     dosage_morning: Some("1".into()),
    ///     expiration: Some("2026-01-01".into()),
    ///     repeat: Some("2".into()),
    ///     ..Default::default()
    /// }
    /// .build(added)
    /// .unwrap();
    ///
    /// assert!(medication.is_due_on(added));
    /// assert!(!medication.is_due_on(added.succ_opt().unwrap()));
    /// assert!(medication.is_due_on(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()));
    /// ```
    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        let days = (date - self.day_added).num_days();
        days >= 0 && days % i64::from(self.repeat.max(1)) == 0
    }

    /// Returns `true` if `date` is after the expiration date.
    pub fn is_expired_on(&self, date: NaiveDate) -> bool {
        date > self.expiration
    }

    /// Multi-line description used by `view`.
    pub fn details(&self) -> String {
        let mut out = format!("Name: {}\nQuantity: {}", self.name, format_amount(self.quantity));
        for period in TimeOfDay::ALL {
            let dosage = self
                .dosage(period)
                .map_or_else(|| "-".to_string(), format_amount);
            out.push_str(&format!("\nDosage ({period}): {dosage}"));
        }
        out.push_str(&format!(
            "\nExpiration date: {}\nRepeat: every {} day(s)\nAdded on: {}",
            self.expiration.format(DATE_FORMAT),
            self.repeat,
            self.day_added.format(DATE_FORMAT)
        ));
        let optional = [
            ("Remarks", &self.remarks),
            ("Illness", &self.illness),
            ("Side effects", &self.side_effects),
            ("Allergies", &self.allergies),
        ];
        for (label, value) in optional {
            if let Some(value) = value {
                out.push_str(&format!("\n{label}: {value}"));
            }
        }
        out
    }
}

impl fmt::Display for Medication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dosages: Vec<String> = TimeOfDay::ALL
            .iter()
            .map(|period| {
                self.dosage(*period)
                    .map_or_else(|| "-".to_string(), format_amount)
            })
            .collect();
        write!(
            f,
            "{} | qty {} | dosage {} | exp {}",
            self.name,
            format_amount(self.quantity),
            dosages.join("/"),
            self.expiration.format(DATE_FORMAT)
        )?;
        if let Some(remarks) = &self.remarks {
            write!(f, " | {remarks}")?;
        }
        Ok(())
    }
}

/// One scheduled dose in today's list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMedication {
    /// Name of the medication the dose belongs to.
    pub name: String,
    /// Period of the dose.
    pub period: TimeOfDay,
    /// Amount taken per dose.
    pub dosage: f64,
    /// Whether the dose was taken.
    pub taken: bool,
}

impl fmt::Display for DailyMedication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.taken { "[X]" } else { "[ ]" };
        write!(f, "{mark} {} ({})", self.name, format_amount(self.dosage))
    }
}

/// Doses scheduled for one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyList {
    /// Date the list was built for.
    pub date: NaiveDate,
    /// Scheduled doses, grouped by period.
    pub entries: Vec<DailyMedication>,
}

impl DailyList {
    /// Creates an empty list for `date`.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            entries: Vec::new(),
        }
    }

    /// Doses for one period, in list order.
    pub fn for_period(&self, period: TimeOfDay) -> Vec<&DailyMedication> {
        self.entries
            .iter()
            .filter(|entry| entry.period == period)
            .collect()
    }
}

/// User-supplied, unconverted medication fields.
///
/// Used both to create a medication ([`build`](MedicationDraft::build)) and
/// to change one ([`apply_to`](MedicationDraft::apply_to)); absent fields
/// are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MedicationDraft {
    pub name: Option<String>,
    pub quantity: Option<String>,
    pub dosage_morning: Option<String>,
    pub dosage_afternoon: Option<String>,
    pub dosage_evening: Option<String>,
    pub expiration: Option<String>,
    pub remarks: Option<String>,
    pub repeat: Option<String>,
    pub illness: Option<String>,
    pub side_effects: Option<String>,
    pub allergies: Option<String>,
}

impl MedicationDraft {
    /// Converts the draft into a new medication added on `today`.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::MissingValue`] if the name, quantity or
    /// expiration date is absent, and [`DatabaseError::InvalidValue`] or
    /// [`DatabaseError::InvalidDate`] for values that do not convert.
    pub fn build(self, today: NaiveDate) -> Result<Medication> {
        let name = self.name.ok_or(DatabaseError::MissingValue("name"))?;
        let quantity = self.quantity.ok_or(DatabaseError::MissingValue("quantity"))?;
        let expiration = self
            .expiration
            .ok_or(DatabaseError::MissingValue("expiration date"))?;

        Ok(Medication {
            name: parse_name(&name)?,
            quantity: parse_quantity(&quantity)?,
            dosage_morning: self.dosage_morning.as_deref().map(parse_dosage).transpose()?,
            dosage_afternoon: self.dosage_afternoon.as_deref().map(parse_dosage).transpose()?,
            dosage_evening: self.dosage_evening.as_deref().map(parse_dosage).transpose()?,
            expiration: parse_date(&expiration)?,
            remarks: self.remarks,
            repeat: self.repeat.as_deref().map(parse_repeat).transpose()?.unwrap_or(1),
            day_added: today,
            illness: self.illness,
            side_effects: self.side_effects,
            allergies: self.allergies,
        })
    }

    /// Returns a copy of `medication` with the supplied fields replaced.
    ///
    /// # Errors
    ///
    /// Same conversion errors as [`build`](MedicationDraft::build).
    pub fn apply_to(self, medication: &Medication) -> Result<Medication> {
        let mut updated = medication.clone();
        if let Some(name) = self.name {
            updated.name = parse_name(&name)?;
        }
        if let Some(quantity) = self.quantity {
            updated.quantity = parse_quantity(&quantity)?;
        }
        if let Some(dosage) = self.dosage_morning {
            updated.dosage_morning = Some(parse_dosage(&dosage)?);
        }
        if let Some(dosage) = self.dosage_afternoon {
            updated.dosage_afternoon = Some(parse_dosage(&dosage)?);
        }
        if let Some(dosage) = self.dosage_evening {
            updated.dosage_evening = Some(parse_dosage(&dosage)?);
        }
        if let Some(expiration) = self.expiration {
            updated.expiration = parse_date(&expiration)?;
        }
        if let Some(repeat) = self.repeat {
            updated.repeat = parse_repeat(&repeat)?;
        }
        if self.remarks.is_some() {
            updated.remarks = self.remarks;
        }
        if self.illness.is_some() {
            updated.illness = self.illness;
        }
        if self.side_effects.is_some() {
            updated.side_effects = self.side_effects;
        }
        if self.allergies.is_some() {
            updated.allergies = self.allergies;
        }
        Ok(updated)
    }

    /// Returns `true` if no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Parses an expiration date in `yyyy-MM-dd` form.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| DatabaseError::InvalidDate(value.to_string()))
}

/// Parses a 1-based list index.
pub fn parse_index(value: &str) -> Result<usize> {
    value
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|index| *index >= 1)
        .ok_or_else(|| invalid("index", value))
}

fn parse_name(value: &str) -> Result<String> {
    let name = value.trim();
    if name.is_empty() {
        return Err(DatabaseError::MissingValue("name"));
    }
    Ok(name.to_string())
}

fn parse_quantity(value: &str) -> Result<f64> {
    let amount = parse_amount("quantity", value)?;
    if amount < 0.0 {
        return Err(invalid("quantity", value));
    }
    Ok(amount)
}

fn parse_dosage(value: &str) -> Result<f64> {
    let amount = parse_amount("dosage", value)?;
    if amount <= 0.0 {
        return Err(invalid("dosage", value));
    }
    Ok(amount)
}

fn parse_repeat(value: &str) -> Result<u32> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|days| *days >= 1)
        .ok_or_else(|| invalid("repeat", value))
}

fn parse_amount(field: &'static str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| invalid(field, value))
}

fn invalid(field: &'static str, value: &str) -> DatabaseError {
    DatabaseError::InvalidValue {
        field,
        value: value.to_string(),
    }
}

/// Formats an amount without a trailing `.0` for whole numbers.
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{amount:.0}")
    } else {
        format!("{amount}")
    }
}
