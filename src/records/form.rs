//! Draft form and rule-based validation
//!
//! The draft form holds raw string values, one per field, the way an input
//! form does. A [`Validator`] maps each field to the rules it must satisfy;
//! submission is only possible when the resulting [`ValidationReport`] is
//! clean.

use chrono::{SecondsFormat, Utc};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::model::{parse_date, ConsumptionRecord, NewConsumption};

/// Fields surfaced to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Type,
    Category,
    Value,
    Source,
    Remark,
    Date,
}

impl Field {
    /// All fields in display order
    pub fn all() -> &'static [Field] {
        &[
            Field::Name,
            Field::Type,
            Field::Category,
            Field::Value,
            Field::Source,
            Field::Remark,
            Field::Date,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Type => "type",
            Field::Category => "category",
            Field::Value => "value",
            Field::Source => "source",
            Field::Remark => "remark",
            Field::Date => "date",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::all()
            .iter()
            .copied()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown field '{}'", s))
    }
}

/// A predicate a field value must satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Non-blank after trimming
    Required,
    /// Parses as a finite number (blank values are left to `Required`)
    Numeric,
    /// Parses as a date (blank values are left to `Required`)
    Date,
}

impl Rule {
    fn check(&self, value: &str) -> Option<Violation> {
        let trimmed = value.trim();
        match self {
            Rule::Required if trimmed.is_empty() => Some(Violation::Missing),
            Rule::Numeric if !trimmed.is_empty() => match trimmed.parse::<f64>() {
                Ok(v) if v.is_finite() => None,
                _ => Some(Violation::NotANumber),
            },
            Rule::Date if !trimmed.is_empty() && parse_date(trimmed).is_none() => {
                Some(Violation::InvalidDate)
            }
            _ => None,
        }
    }
}

/// Why a field failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    Missing,
    NotANumber,
    InvalidDate,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Missing => write!(f, "is required"),
            Violation::NotANumber => write!(f, "must be a number"),
            Violation::InvalidDate => write!(f, "is not a valid date"),
        }
    }
}

/// Rule table: field -> rules
#[derive(Debug, Clone, Default)]
pub struct Validator {
    rules: BTreeMap<Field, Vec<Rule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: add a rule for a field
    pub fn rule(mut self, field: Field, rule: Rule) -> Self {
        self.rules.entry(field).or_default().push(rule);
        self
    }

    /// Rules for the consumption form: everything but the remark is required
    pub fn consumption() -> Self {
        Self::new()
            .rule(Field::Name, Rule::Required)
            .rule(Field::Type, Rule::Required)
            .rule(Field::Category, Rule::Required)
            .rule(Field::Value, Rule::Required)
            .rule(Field::Value, Rule::Numeric)
            .rule(Field::Source, Rule::Required)
            .rule(Field::Date, Rule::Required)
            .rule(Field::Date, Rule::Date)
    }

    pub fn rules_for(&self, field: Field) -> &[Rule] {
        self.rules.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Evaluate every rule against the form's current values
    pub fn validate(&self, form: &ConsumptionForm) -> ValidationReport {
        let mut violations: BTreeMap<Field, Vec<Violation>> = BTreeMap::new();

        for (field, rules) in &self.rules {
            let value = form.get(*field);
            for rule in rules {
                if let Some(v) = rule.check(value) {
                    violations.entry(*field).or_default().push(v);
                }
            }
        }

        ValidationReport { violations }
    }

    /// Evaluate the rules against a stored record, e.g. an edit subject
    pub fn validate_record(&self, record: &ConsumptionRecord) -> ValidationReport {
        self.validate(&ConsumptionForm::from_record(record))
    }
}

/// Outcome of validating a form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    violations: BTreeMap<Field, Vec<Violation>>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations_for(&self, field: Field) -> &[Violation] {
        self.violations.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    fn push(&mut self, field: Field, violation: Violation) {
        self.violations.entry(field).or_default().push(violation);
    }

    /// Fields with at least one violation
    pub fn invalid_fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.violations.keys().copied()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, violations) in &self.violations {
            for v in violations {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{} {}", field, v)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Draft of a new consumption record
#[derive(Debug, Clone)]
pub struct ConsumptionForm {
    values: BTreeMap<Field, String>,
    validator: Validator,
}

impl Default for ConsumptionForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsumptionForm {
    /// Empty form with the consumption rules; the date starts at now
    pub fn new() -> Self {
        Self::with_validator(Validator::consumption())
    }

    pub fn with_validator(validator: Validator) -> Self {
        let mut form = Self {
            values: BTreeMap::new(),
            validator,
        };
        form.reset();
        form
    }

    /// Form populated from a stored record, checked by the consumption rules
    pub fn from_record(record: &ConsumptionRecord) -> Self {
        let mut form = Self::new()
            .with(Field::Name, record.name.as_str())
            .with(Field::Type, record.kind.as_str())
            .with(Field::Category, record.category.as_str())
            .with(Field::Value, record.value.to_string())
            .with(Field::Source, record.source.as_str())
            .with(Field::Date, record.date.to_rfc3339_opts(SecondsFormat::Secs, true));
        if let Some(remark) = &record.remark {
            form.set(Field::Remark, remark.as_str());
        }
        form
    }

    pub fn get(&self, field: Field) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    /// Builder method: set a field
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Clear every field; the date returns to now
    pub fn reset(&mut self) {
        self.values.clear();
        self.values.insert(
            Field::Date,
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        );
    }

    pub fn is_pristine(&self) -> bool {
        Field::all()
            .iter()
            .filter(|f| **f != Field::Date)
            .all(|f| self.get(*f).is_empty())
    }

    pub fn validate(&self) -> ValidationReport {
        self.validator.validate(self)
    }

    /// Validated payload, or the report explaining why submission is blocked.
    ///
    /// Value and date must convert even when the validator has no rule for
    /// them; a failed conversion is reported like a rule violation.
    pub fn to_new_consumption(&self) -> Result<NewConsumption, ValidationReport> {
        let mut report = self.validate();

        let raw_value = self.get(Field::Value).trim();
        let value = raw_value.parse::<f64>().ok().filter(|v| v.is_finite());
        if value.is_none() && report.violations_for(Field::Value).is_empty() {
            let violation = if raw_value.is_empty() {
                Violation::Missing
            } else {
                Violation::NotANumber
            };
            report.push(Field::Value, violation);
        }

        let raw_date = self.get(Field::Date).trim();
        let date = parse_date(raw_date);
        if date.is_none() && report.violations_for(Field::Date).is_empty() {
            let violation = if raw_date.is_empty() {
                Violation::Missing
            } else {
                Violation::InvalidDate
            };
            report.push(Field::Date, violation);
        }

        let (Some(value), Some(date)) = (value, date) else {
            return Err(report);
        };
        if !report.is_valid() {
            return Err(report);
        }
        let remark = Some(self.get(Field::Remark).trim())
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        Ok(NewConsumption {
            name: self.get(Field::Name).trim().to_string(),
            kind: self.get(Field::Type).trim().to_string(),
            category: self.get(Field::Category).trim().to_string(),
            value,
            source: self.get(Field::Source).trim().to_string(),
            remark,
            date,
        })
    }
}
