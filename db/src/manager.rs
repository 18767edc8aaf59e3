//! Medication list and today's doses.
//!
//! [`MedicationManager`] is an ordinary value owned by the caller and passed
//! by reference to whatever needs it. All indices taken by its methods are
//! 1-based, matching what the user sees in listings.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::{DatabaseError, Result};
use crate::model::{DailyList, DailyMedication, Medication, MedicationDraft, TimeOfDay};

/// Criteria for [`MedicationManager::search`].
///
/// Every supplied criterion must match, case-insensitively, as a substring
/// of the corresponding field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub name: Option<String>,
    pub illness: Option<String>,
    pub side_effects: Option<String>,
    pub allergies: Option<String>,
}

impl SearchCriteria {
    /// Returns `true` if no criterion is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns `true` if `medication` satisfies every supplied criterion.
    pub fn matches(&self, medication: &Medication) -> bool {
        contains(Some(medication.name.as_str()), self.name.as_deref())
            && contains(medication.illness.as_deref(), self.illness.as_deref())
            && contains(medication.side_effects.as_deref(), self.side_effects.as_deref())
            && contains(medication.allergies.as_deref(), self.allergies.as_deref())
    }
}

fn contains(field: Option<&str>, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(needle) => field.is_some_and(|field| {
            field
                .to_lowercase()
                .contains(&needle.trim().to_lowercase())
        }),
    }
}

/// Owns the medication list and the dose list for the current day.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use medtrack_db::{MedicationDraft, MedicationManager, TimeOfDay};
///
/// let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
/// let mut manager = MedicationManager::new(today);
///
/// let medication = MedicationDraft {
///     name: Some("Aspirin".into()),
///     quantity: Some("30".into()),
///     dosage_morning: Some("2".into()),
///     expiration: Some("2025-01-01".into()),
///     ..Default::default()
/// }
/// .build(today)
/// .unwrap();
/// manager.add(medication).unwrap();
///
/// manager.take(1, TimeOfDay::Morning).unwrap();
/// assert_eq!(manager.get(1).unwrap().quantity, 28.0);
/// assert!(manager.take(1, TimeOfDay::Morning).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct MedicationManager {
    medications: Vec<Medication>,
    daily: DailyList,
}

impl MedicationManager {
    /// Creates an empty manager for `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self::from_parts(Vec::new(), None, today)
    }

    /// Restores a manager from stored parts.
    ///
    /// A stored dose list for another date is discarded and rebuilt.
    pub fn from_parts(
        medications: Vec<Medication>,
        daily: Option<DailyList>,
        today: NaiveDate,
    ) -> Self {
        let mut manager = Self {
            medications,
            daily: DailyList::new(today),
        };
        match daily {
            Some(daily) if daily.date == today => manager.daily = daily,
            _ => manager.rebuild_daily(today),
        }
        manager
    }

    /// All medications in insertion order.
    pub fn medications(&self) -> &[Medication] {
        &self.medications
    }

    /// Doses scheduled for [`today`](MedicationManager::today).
    pub fn daily(&self) -> &DailyList {
        &self.daily
    }

    /// Date the dose list belongs to.
    pub fn today(&self) -> NaiveDate {
        self.daily.date
    }

    /// Number of medications.
    pub fn len(&self) -> usize {
        self.medications.len()
    }

    /// Returns `true` if no medication is tracked.
    pub fn is_empty(&self) -> bool {
        self.medications.is_empty()
    }

    /// Rebuilds the dose list if `today` is a new day.
    ///
    /// Returns `true` if the list was rebuilt.
    pub fn refresh_daily(&mut self, today: NaiveDate) -> bool {
        if self.daily.date == today {
            return false;
        }
        self.rebuild_daily(today);
        true
    }

    /// Adds a medication and schedules its doses for today.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::DuplicateMedication`] if a medication with
    /// the same name (ignoring case) exists.
    pub fn add(&mut self, medication: Medication) -> Result<&Medication> {
        if self.position_of(&medication.name).is_some() {
            return Err(DatabaseError::DuplicateMedication(medication.name));
        }
        info!(name = %medication.name, "adding medication");

        self.schedule(&medication, &[]);
        self.medications.push(medication);
        Ok(&self.medications[self.medications.len() - 1])
    }

    /// Returns the medication at a 1-based index.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::IndexOutOfRange`] for an invalid index.
    pub fn get(&self, index: usize) -> Result<&Medication> {
        let position = self.checked_position(index)?;
        Ok(&self.medications[position])
    }

    /// Removes the medication at a 1-based index along with its doses.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::IndexOutOfRange`] for an invalid index.
    pub fn delete(&mut self, index: usize) -> Result<Medication> {
        let position = self.checked_position(index)?;
        let removed = self.medications.remove(position);
        self.unschedule(&removed.name);
        info!(name = %removed.name, "deleted medication");
        Ok(removed)
    }

    /// Applies `patch` to the medication at a 1-based index.
    ///
    /// Today's open doses are rescheduled from the updated dosages. Doses
    /// already taken keep the amount that was deducted, so an `untake`
    /// after the change returns exactly that amount to stock.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::IndexOutOfRange`] for an invalid index,
    /// [`DatabaseError::DuplicateMedication`] when renaming onto another
    /// medication, or a conversion error from the patch.
    pub fn modify(&mut self, index: usize, patch: MedicationDraft) -> Result<&Medication> {
        let position = self.checked_position(index)?;
        let updated = patch.apply_to(&self.medications[position])?;

        if let Some(other) = self.position_of(&updated.name) {
            if other != position {
                return Err(DatabaseError::DuplicateMedication(updated.name));
            }
        }

        let old_name = self.medications[position].name.clone();
        let taken: Vec<DailyMedication> = self
            .daily
            .entries
            .iter()
            .filter(|entry| entry.name == old_name && entry.taken)
            .map(|entry| DailyMedication {
                name: updated.name.clone(),
                ..entry.clone()
            })
            .collect();
        let taken_periods: Vec<TimeOfDay> = taken.iter().map(|entry| entry.period).collect();

        self.unschedule(&old_name);
        self.daily.entries.extend(taken);
        self.schedule(&updated, &taken_periods);

        info!(name = %updated.name, "modified medication");
        self.medications[position] = updated;
        Ok(&self.medications[position])
    }

    /// Finds medications matching `criteria`, with their 1-based indices.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::EmptySearch`] if no criterion is set.
    pub fn search(&self, criteria: &SearchCriteria) -> Result<Vec<(usize, &Medication)>> {
        if criteria.is_empty() {
            return Err(DatabaseError::EmptySearch);
        }
        Ok(self
            .medications
            .iter()
            .enumerate()
            .filter(|(_, medication)| criteria.matches(medication))
            .map(|(position, medication)| (position + 1, medication))
            .collect())
    }

    /// Marks a dose as taken and deducts it from stock.
    ///
    /// `index` is 1-based within the doses of `period`.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::IndexOutOfRange`],
    /// [`DatabaseError::AlreadyTaken`], [`DatabaseError::Expired`] or
    /// [`DatabaseError::InsufficientQuantity`].
    pub fn take(&mut self, index: usize, period: TimeOfDay) -> Result<DailyMedication> {
        let entry_position = self.dose_position(index, period)?;
        let entry = &self.daily.entries[entry_position];
        if entry.taken {
            return Err(DatabaseError::AlreadyTaken {
                name: entry.name.clone(),
                period,
            });
        }

        let today = self.daily.date;
        let (name, dosage) = (entry.name.clone(), entry.dosage);
        let medication = self.medication_named(&name)?;
        if medication.is_expired_on(today) {
            return Err(DatabaseError::Expired {
                name: medication.name.clone(),
                expiration: medication.expiration,
            });
        }
        if medication.quantity < dosage {
            return Err(DatabaseError::InsufficientQuantity {
                name: medication.name.clone(),
                available: medication.quantity,
                required: dosage,
            });
        }
        medication.quantity -= dosage;

        let entry = &mut self.daily.entries[entry_position];
        entry.taken = true;
        debug!(name = %entry.name, %period, "dose taken");
        Ok(entry.clone())
    }

    /// Reverts a taken dose and returns it to stock.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::IndexOutOfRange`] or
    /// [`DatabaseError::NotTaken`].
    pub fn untake(&mut self, index: usize, period: TimeOfDay) -> Result<DailyMedication> {
        let entry_position = self.dose_position(index, period)?;
        let entry = &self.daily.entries[entry_position];
        if !entry.taken {
            return Err(DatabaseError::NotTaken {
                name: entry.name.clone(),
                period,
            });
        }

        let (name, dosage) = (entry.name.clone(), entry.dosage);
        self.medication_named(&name)?.quantity += dosage;

        let entry = &mut self.daily.entries[entry_position];
        entry.taken = false;
        debug!(name = %entry.name, %period, "dose untaken");
        Ok(entry.clone())
    }

    fn checked_position(&self, index: usize) -> Result<usize> {
        if index == 0 || index > self.medications.len() {
            return Err(DatabaseError::IndexOutOfRange {
                index,
                len: self.medications.len(),
            });
        }
        Ok(index - 1)
    }

    fn position_of(&self, name: &str) -> Option<usize> {
        self.medications
            .iter()
            .position(|medication| medication.name.eq_ignore_ascii_case(name))
    }

    fn medication_named(&mut self, name: &str) -> Result<&mut Medication> {
        self.medications
            .iter_mut()
            .find(|medication| medication.name == name)
            .ok_or_else(|| DatabaseError::MedicationNotFound(name.to_string()))
    }

    fn dose_position(&self, index: usize, period: TimeOfDay) -> Result<usize> {
        let positions: Vec<usize> = self
            .daily
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.period == period)
            .map(|(position, _)| position)
            .collect();
        index
            .checked_sub(1)
            .and_then(|offset| positions.get(offset).copied())
            .ok_or(DatabaseError::IndexOutOfRange {
                index,
                len: positions.len(),
            })
    }

    fn rebuild_daily(&mut self, today: NaiveDate) {
        debug!(%today, "rebuilding daily list");
        self.daily = DailyList::new(today);
        let medications = std::mem::take(&mut self.medications);
        for medication in &medications {
            self.schedule(medication, &[]);
        }
        self.medications = medications;
    }

    /// Adds open doses for `medication`, except for periods in `skip`.
    fn schedule(&mut self, medication: &Medication, skip: &[TimeOfDay]) {
        if medication.is_due_on(self.daily.date) {
            for period in TimeOfDay::ALL {
                if skip.contains(&period) {
                    continue;
                }
                if let Some(dosage) = medication.dosage(period) {
                    self.daily.entries.push(DailyMedication {
                        name: medication.name.clone(),
                        period,
                        dosage,
                        taken: false,
                    });
                }
            }
        }
        self.daily.entries.sort_by_key(|entry| entry.period);
    }

    fn unschedule(&mut self, name: &str) {
        self.daily.entries.retain(|entry| entry.name != name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn medication(name: &str, quantity: &str, morning: Option<&str>, evening: Option<&str>) -> Medication {
        MedicationDraft {
            name: Some(name.into()),
            quantity: Some(quantity.into()),
            dosage_morning: morning.map(Into::into),
            dosage_evening: evening.map(Into::into),
            expiration: Some("2030-01-01".into()),
            ..Default::default()
        }
        .build(date(2024, 6, 1))
        .unwrap()
    }

    fn manager() -> MedicationManager {
        let mut manager = MedicationManager::new(date(2024, 6, 1));
        manager.add(medication("Aspirin", "30", Some("2"), None)).unwrap();
        manager
            .add(medication("Metformin", "10", Some("1"), Some("1")))
            .unwrap();
        manager
    }

    #[test]
    fn test_add_schedules_doses_grouped_by_period() {
        let manager = manager();
        let periods: Vec<(&str, TimeOfDay)> = manager
            .daily()
            .entries
            .iter()
            .map(|entry| (entry.name.as_str(), entry.period))
            .collect();
        assert_eq!(
            periods,
            vec![
                ("Aspirin", TimeOfDay::Morning),
                ("Metformin", TimeOfDay::Morning),
                ("Metformin", TimeOfDay::Evening),
            ]
        );
    }

    #[test]
    fn test_add_rejects_duplicate_name_ignoring_case() {
        let mut manager = manager();
        let result = manager.add(medication("aspirin", "5", Some("1"), None));
        assert!(matches!(result, Err(DatabaseError::DuplicateMedication(_))));
    }

    #[test]
    fn test_index_bounds() {
        let manager = manager();
        assert!(manager.get(1).is_ok());
        assert!(matches!(
            manager.get(0),
            Err(DatabaseError::IndexOutOfRange { index: 0, len: 2 })
        ));
        assert!(matches!(
            manager.get(3),
            Err(DatabaseError::IndexOutOfRange { index: 3, len: 2 })
        ));
    }

    #[test]
    fn test_delete_removes_doses() {
        let mut manager = manager();
        let removed = manager.delete(2).unwrap();
        assert_eq!(removed.name, "Metformin");
        assert_eq!(manager.len(), 1);
        assert!(manager.daily().entries.iter().all(|e| e.name == "Aspirin"));
    }

    #[test]
    fn test_take_and_untake_adjust_stock() {
        let mut manager = manager();
        let dose = manager.take(1, TimeOfDay::Evening).unwrap();
        assert_eq!(dose.name, "Metformin");
        assert!(dose.taken);
        assert_eq!(manager.get(2).unwrap().quantity, 9.0);

        assert!(matches!(
            manager.take(1, TimeOfDay::Evening),
            Err(DatabaseError::AlreadyTaken { .. })
        ));

        manager.untake(1, TimeOfDay::Evening).unwrap();
        assert_eq!(manager.get(2).unwrap().quantity, 10.0);
        assert!(matches!(
            manager.untake(1, TimeOfDay::Evening),
            Err(DatabaseError::NotTaken { .. })
        ));
    }

    #[test]
    fn test_take_index_is_per_period() {
        let mut manager = manager();
        assert!(matches!(
            manager.take(2, TimeOfDay::Evening),
            Err(DatabaseError::IndexOutOfRange { index: 2, len: 1 })
        ));
        assert!(matches!(
            manager.take(1, TimeOfDay::Afternoon),
            Err(DatabaseError::IndexOutOfRange { index: 1, len: 0 })
        ));
    }

    #[test]
    fn test_take_rejects_insufficient_stock() {
        let mut manager = MedicationManager::new(date(2024, 6, 1));
        manager
            .add(medication("Iron", "1", Some("2"), None))
            .unwrap();
        assert!(matches!(
            manager.take(1, TimeOfDay::Morning),
            Err(DatabaseError::InsufficientQuantity { .. })
        ));
    }

    #[test]
    fn test_take_rejects_expired() {
        let mut manager = MedicationManager::new(date(2031, 1, 1));
        let mut expired = medication("Old", "5", Some("1"), None);
        expired.day_added = date(2031, 1, 1);
        manager.add(expired).unwrap();
        assert!(matches!(
            manager.take(1, TimeOfDay::Morning),
            Err(DatabaseError::Expired { .. })
        ));
    }

    #[test]
    fn test_modify_keeps_taken_doses() {
        let mut manager = manager();
        manager.take(1, TimeOfDay::Morning).unwrap();
        let patch = MedicationDraft {
            name: Some("Aspirin 100".into()),
            dosage_evening: Some("1".into()),
            ..Default::default()
        };
        manager.modify(1, patch).unwrap();

        let doses: Vec<(&str, TimeOfDay, bool)> = manager
            .daily()
            .entries
            .iter()
            .filter(|entry| entry.name == "Aspirin 100")
            .map(|entry| (entry.name.as_str(), entry.period, entry.taken))
            .collect();
        assert_eq!(
            doses,
            vec![
                ("Aspirin 100", TimeOfDay::Morning, true),
                ("Aspirin 100", TimeOfDay::Evening, false),
            ]
        );
    }

    #[test]
    fn test_untake_after_dosage_change_refunds_taken_amount() {
        let mut manager = manager();
        manager.take(1, TimeOfDay::Morning).unwrap();
        assert_eq!(manager.get(1).unwrap().quantity, 28.0);

        let patch = MedicationDraft {
            dosage_morning: Some("5".into()),
            ..Default::default()
        };
        manager.modify(1, patch).unwrap();
        assert_eq!(manager.get(1).unwrap().dosage_morning, Some(5.0));

        let dose = manager.untake(1, TimeOfDay::Morning).unwrap();
        assert_eq!(dose.dosage, 2.0);
        assert_eq!(manager.get(1).unwrap().quantity, 30.0);
    }

    #[test]
    fn test_modify_does_not_reschedule_taken_period() {
        let mut manager = manager();
        manager.take(1, TimeOfDay::Evening).unwrap();
        let patch = MedicationDraft {
            dosage_morning: Some("3".into()),
            dosage_evening: Some("3".into()),
            ..Default::default()
        };
        manager.modify(2, patch).unwrap();

        let evening = manager.daily().for_period(TimeOfDay::Evening);
        assert_eq!(evening.len(), 1);
        assert!(evening[0].taken);
        assert_eq!(evening[0].dosage, 1.0);

        let morning = manager.daily().for_period(TimeOfDay::Morning);
        assert_eq!(morning[1].name, "Metformin");
        assert_eq!(morning[1].dosage, 3.0);
        assert!(!morning[1].taken);
    }

    #[test]
    fn test_modify_rejects_rename_onto_other() {
        let mut manager = manager();
        let patch = MedicationDraft {
            name: Some("METFORMIN".into()),
            ..Default::default()
        };
        assert!(matches!(
            manager.modify(1, patch),
            Err(DatabaseError::DuplicateMedication(_))
        ));
    }

    #[test]
    fn test_search_requires_all_criteria() {
        let mut manager = manager();
        let patch = MedicationDraft {
            illness: Some("Type 2 diabetes".into()),
            ..Default::default()
        };
        manager.modify(2, patch).unwrap();

        let criteria = SearchCriteria {
            illness: Some("diabetes".into()),
            ..Default::default()
        };
        let found = manager.search(&criteria).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, 2);

        let criteria = SearchCriteria {
            name: Some("asp".into()),
            illness: Some("diabetes".into()),
            ..Default::default()
        };
        assert!(manager.search(&criteria).unwrap().is_empty());

        assert!(matches!(
            manager.search(&SearchCriteria::default()),
            Err(DatabaseError::EmptySearch)
        ));
    }

    #[test]
    fn test_refresh_daily_respects_repeat() {
        let mut manager = MedicationManager::new(date(2024, 6, 1));
        let mut every_other_day = medication("Iron", "10", Some("1"), None);
        every_other_day.repeat = 2;
        manager.add(every_other_day).unwrap();
        manager.take(1, TimeOfDay::Morning).unwrap();

        assert!(!manager.refresh_daily(date(2024, 6, 1)));
        assert!(manager.refresh_daily(date(2024, 6, 2)));
        assert!(manager.daily().entries.is_empty());

        assert!(manager.refresh_daily(date(2024, 6, 3)));
        assert_eq!(manager.daily().entries.len(), 1);
        assert!(!manager.daily().entries[0].taken);
    }

    #[test]
    fn test_from_parts_discards_stale_daily_list() {
        let stale = DailyList {
            date: date(2024, 5, 31),
            entries: vec![DailyMedication {
                name: "Aspirin".into(),
                period: TimeOfDay::Morning,
                dosage: 2.0,
                taken: true,
            }],
        };
        let medications = vec![medication("Aspirin", "30", Some("2"), None)];
        let manager = MedicationManager::from_parts(medications, Some(stale), date(2024, 6, 1));
        assert_eq!(manager.today(), date(2024, 6, 1));
        assert!(!manager.daily().entries[0].taken);
    }
}
