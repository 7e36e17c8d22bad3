//! Job submission payload and the builder that produces it.
//!
//! The reporting service expects a JSON body of the form
//! `{"template": {...}, "parameters": [...], "culture"?, "dpi"?}`. Each
//! parameter carries a `containsMultipleValues` flag which decides
//! whether the value travels in `value` or `values`.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::params::{JobParameters, ParameterValue};

/// Identifies the report or print template to run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobTemplateRef {
    pub item_id: String,
    pub portal_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// One named job parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct JobParameter {
    pub name: String,
    pub value: ParameterValue,
}

impl Serialize for JobParameter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("JobParameter", 3)?;
        state.serialize_field("name", &self.name)?;
        match self.value.as_values() {
            Some(values) => {
                state.serialize_field("containsMultipleValues", &true)?;
                state.serialize_field("values", values)?;
            }
            None => {
                state.serialize_field("containsMultipleValues", &false)?;
                state.serialize_field("value", &self.value.as_value())?;
            }
        }
        state.end()
    }
}

/// The complete request body for `POST /job/run`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSubmission {
    pub template: JobTemplateRef,
    pub parameters: Vec<JobParameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub culture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dpi: Option<u32>,
}

/// Caller-controlled inputs to a job besides the template location.
#[derive(Debug, Clone, Default)]
pub struct JobOptions {
    pub parameters: JobParameters,
    /// Locale used for localisation, e.g. `fr-CA`.
    pub culture: Option<String>,
    /// Rendering resolution for map prints.
    pub dpi: Option<u32>,
    /// Human-readable title for the produced artifact.
    pub title: Option<String>,
}

/// Build the submission payload for a template.
///
/// Parameters keep the order of `options.parameters`. An empty culture
/// and a zero dpi are treated as absent.
pub fn build_submission(item_id: &str, portal_url: &str, options: &JobOptions) -> JobSubmission {
    let parameters = options
        .parameters
        .iter()
        .map(|(name, value)| JobParameter {
            name: name.clone(),
            value: value.clone(),
        })
        .collect();

    JobSubmission {
        template: JobTemplateRef {
            item_id: item_id.to_string(),
            portal_url: portal_url.to_string(),
            title: options.title.clone(),
        },
        parameters,
        culture: options.culture.clone().filter(|c| !c.is_empty()),
        dpi: options.dpi.filter(|&dpi| dpi != 0),
    }
}
