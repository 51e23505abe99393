//! Reading a model back from its YAML summary
//!
//! A mapping is a leaf series when it is non-empty and every key is a year of
//! the period domain; any other mapping is a section.

use crate::error::{DcfError, DcfResult};
use crate::schedule::definition::PeriodsConfig;
use crate::schedule::model::Model;
use crate::types::{Node, PeriodDomain, Schedule, Section, Series, Year};
use serde_yaml::{Mapping, Value};

/// Parse a YAML summary produced by `Model::summary`
pub fn read_snapshot(content: &str) -> DcfResult<Model> {
    let root: Value = serde_yaml::from_str(content)?;
    let Value::Mapping(root) = root else {
        return Err(DcfError::Definition(
            "snapshot must be a mapping with a 'schedules' key".to_string(),
        ));
    };

    let domain = match root.get("periods") {
        Some(periods) => serde_yaml::from_value::<PeriodsConfig>(periods.clone())?.domain()?,
        None => PeriodDomain::default(),
    };
    let company = match root.get("company") {
        None | Some(Value::Null) => None,
        Some(Value::String(name)) => Some(name.clone()),
        Some(other) => {
            return Err(DcfError::Definition(format!(
                "company must be a string, got {:?}",
                other
            )))
        }
    };

    let schedules = match root.get("schedules") {
        Some(Value::Mapping(map)) => map,
        _ => {
            return Err(DcfError::Definition(
                "snapshot is missing a 'schedules' mapping".to_string(),
            ))
        }
    };

    let mut built = Vec::with_capacity(schedules.len());
    for (name, body) in schedules {
        let name = key_string(name)?;
        let Value::Mapping(body) = body else {
            return Err(DcfError::Definition(format!(
                "schedule '{}' must be a mapping",
                name
            )));
        };
        let root = read_section(body, &domain, &name)?;
        built.push(Schedule::new(name, root));
    }

    tracing::debug!(schedules = built.len(), "read model snapshot");
    Ok(Model::from_schedules(domain, built).with_company(company))
}

fn read_section(map: &Mapping, domain: &PeriodDomain, path: &str) -> DcfResult<Section> {
    let mut section = Section::new();
    for (key, value) in map {
        let key = key_string(key)?;
        let child_path = format!("{}.{}", path, key);
        let node = match value {
            Value::Mapping(child) => match as_series(child, domain) {
                Some(series) => Node::Leaf(series),
                None => Node::Section(read_section(child, domain, &child_path)?),
            },
            other => {
                return Err(DcfError::Definition(format!(
                    "'{}' must be a section or a {{year: value}} mapping, got {:?}",
                    child_path, other
                )))
            }
        };
        section.push(key, node);
    }
    Ok(section)
}

/// `Some` when the mapping is non-empty and every key is a domain year.
///
/// The keys alone decide; values that are not numbers are dropped.
fn as_series(map: &Mapping, domain: &PeriodDomain) -> Option<Series> {
    if map.is_empty() {
        return None;
    }
    let years = map
        .keys()
        .map(|k| {
            let year = Year::try_from(k.as_i64()?).ok()?;
            domain.contains(year).then_some(year)
        })
        .collect::<Option<Vec<Year>>>()?;

    let mut series = Series::new();
    for (year, value) in years.into_iter().zip(map.values()) {
        match coerce_number(value) {
            Some(number) => series.insert(year, number),
            None => tracing::trace!(year, ?value, "dropped non-numeric snapshot value"),
        }
    }
    Some(series)
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn key_string(key: &Value) -> DcfResult<String> {
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(DcfError::Definition(format!(
            "mapping keys must be strings, got {:?}",
            other
        ))),
    }
}
