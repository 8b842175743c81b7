//! Field classification
//!
//! Decides, per record field, whether a walker treats it as a file path
//! (singular or plural), recurses into it, or skips it.
//!
//! Decision order: hidden > exclusion override > inclusion override >
//! naming convention > plain.

use std::any::TypeId;
use std::collections::{HashMap, HashSet};

use configwalk_graph::{type_name_of, FieldDef, FieldType, RecordType, Value};
use serde::{Deserialize, Serialize};

use crate::error::{ConventionError, FieldError};

/// Naming convention for file-like fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Convention {
    /// Suffix marking a `String` field as a single file path
    pub file_suffix: String,
    /// Suffix marking a `Vec<String>` field as a list of file paths
    pub files_suffix: String,
    /// Also clear `Secret` siblings when rewriting a file field
    pub clear_secret_siblings: bool,
}

impl Default for Convention {
    fn default() -> Self {
        Self {
            file_suffix: "_file".to_owned(),
            files_suffix: "_files".to_owned(),
            clear_secret_siblings: false,
        }
    }
}

impl Convention {
    /// `File` / `Files` suffixes, for records whose field names are camel case
    #[must_use]
    pub fn camel_case() -> Self {
        Self {
            file_suffix: "File".to_owned(),
            files_suffix: "Files".to_owned(),
            ..Self::default()
        }
    }

    /// Parse a convention from YAML; missing keys take their defaults
    ///
    /// # Errors
    /// Returns [`ConventionError::InvalidYaml`] for malformed input
    pub fn from_yaml(source: &str) -> Result<Self, ConventionError> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Parse a convention from JSON; missing keys take their defaults
    ///
    /// # Errors
    /// Returns [`ConventionError::InvalidJson`] for malformed input
    pub fn from_json(source: &str) -> Result<Self, ConventionError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Whether `name` follows the singular file convention
    #[inline]
    #[must_use]
    pub fn is_file(&self, name: &str) -> bool {
        !self.file_suffix.is_empty() && name.ends_with(&self.file_suffix)
    }

    /// Whether `name` follows the plural file convention
    #[inline]
    #[must_use]
    pub fn is_files(&self, name: &str) -> bool {
        !self.files_suffix.is_empty() && name.ends_with(&self.files_suffix)
    }

    /// Name of the raw-value sibling of a file field (`foo_file` -> `foo`)
    #[must_use]
    pub fn sibling_of<'a>(&self, name: &'a str) -> Option<&'a str> {
        name.strip_suffix(self.file_suffix.as_str())
            .filter(|sibling| !sibling.is_empty())
    }
}

/// How a walker treats one field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldClass {
    /// Not externally settable; rewrite and assertion never touch it
    Skip,
    /// A single file path
    File,
    /// A list of file paths
    Files,
    /// Anything else; walked as a node of its own
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Override {
    Include,
    Exclude,
}

/// A validated include/exclude override for one record field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOption {
    mode: Override,
    record: TypeId,
    record_name: String,
    field: &'static str,
}

impl FieldOption {
    /// Short type name of the record the override applies to
    #[inline]
    #[must_use]
    pub fn record_name(&self) -> &str {
        &self.record_name
    }

    /// Field the override applies to
    #[inline]
    #[must_use]
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Whether this override excludes the field
    #[inline]
    #[must_use]
    pub fn is_exclude(&self) -> bool {
        self.mode == Override::Exclude
    }
}

/// Treat `sample`'s field `name` as file-like regardless of its name
///
/// Pointer and `Option` layers around the sample are looked through.
///
/// # Errors
/// [`FieldError::NotARecord`] if `T` is not a record,
/// [`FieldError::UnknownField`] if it has no field `name`.
pub fn include_field<T: Value>(_sample: &T, name: &str) -> Result<FieldOption, FieldError> {
    option::<T>(Override::Include, name)
}

/// Never treat `sample`'s field `name` as file-like, even if its name says so
///
/// # Errors
/// Same as [`include_field`].
pub fn exclude_field<T: Value>(_sample: &T, name: &str) -> Result<FieldOption, FieldError> {
    option::<T>(Override::Exclude, name)
}

fn option<T: Value>(mode: Override, name: &str) -> Result<FieldOption, FieldError> {
    let (record, def) = lookup::<T>(name)?;
    Ok(FieldOption {
        mode,
        record: record.id(),
        record_name: record.name().to_owned(),
        field: def.name(),
    })
}

fn lookup<T: Value>(name: &str) -> Result<(RecordType, FieldDef), FieldError> {
    let record = T::record_type().map_err(|kind| FieldError::NotARecord {
        type_name: type_name_of::<T>(),
        kind,
    })?;
    let def = record
        .field(name)
        .copied()
        .ok_or_else(|| FieldError::UnknownField {
            field: name.to_owned(),
            record: record.name().to_owned(),
        })?;
    Ok((record, def))
}

/// Convention plus overrides
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    convention: Convention,
    include: HashMap<TypeId, HashSet<&'static str>>,
    exclude: HashMap<TypeId, HashSet<&'static str>>,
}

impl Classifier {
    /// Classifier with no overrides
    #[must_use]
    pub fn new(convention: Convention) -> Self {
        Self {
            convention,
            include: HashMap::new(),
            exclude: HashMap::new(),
        }
    }

    /// Add an override
    #[must_use]
    pub fn with_option(mut self, option: FieldOption) -> Self {
        self.add(option);
        self
    }

    /// Add an override in place
    pub fn add(&mut self, option: FieldOption) {
        let target = match option.mode {
            Override::Include => &mut self.include,
            Override::Exclude => &mut self.exclude,
        };
        target.entry(option.record).or_default().insert(option.field);
    }

    /// Naming convention in use
    #[inline]
    #[must_use]
    pub fn convention(&self) -> &Convention {
        &self.convention
    }

    /// Classify field `name` of record type `T`
    ///
    /// # Errors
    /// Same as [`include_field`].
    pub fn classify_field<T: Value>(&self, name: &str) -> Result<FieldClass, FieldError> {
        let (record, def) = lookup::<T>(name)?;
        Ok(self.classify(record.id(), &def))
    }

    pub(crate) fn classify(&self, record: TypeId, def: &FieldDef) -> FieldClass {
        if !def.is_exported() {
            return FieldClass::Skip;
        }
        let name = def.name();
        if Self::listed(&self.exclude, record, name) {
            return FieldClass::Plain;
        }
        let included = Self::listed(&self.include, record, name);
        match def.ty() {
            FieldType::String if included || self.convention.is_file(name) => FieldClass::File,
            FieldType::StringList if included || self.convention.is_files(name) => {
                FieldClass::Files
            }
            _ => FieldClass::Plain,
        }
    }

    fn listed(set: &HashMap<TypeId, HashSet<&'static str>>, record: TypeId, name: &str) -> bool {
        set.get(&record).is_some_and(|fields| fields.contains(name))
    }
}

impl FromIterator<FieldOption> for Classifier {
    fn from_iter<I: IntoIterator<Item = FieldOption>>(iter: I) -> Self {
        let mut classifier = Self::default();
        classifier.extend(iter);
        classifier
    }
}

impl Extend<FieldOption> for Classifier {
    fn extend<I: IntoIterator<Item = FieldOption>>(&mut self, iter: I) {
        for option in iter {
            self.add(option);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use configwalk_graph::{record, Kind, Secret};

    use super::*;

    #[derive(Default)]
    struct Sample {
        ca: String,
        ca_file: String,
        rule_files: Vec<String>,
        extra: String,
        extras: Vec<String>,
        key: Secret,
        key_file: Secret,
        exclude_file: String,
        cache_file: String,
    }

    record!(Sample {
        ca,
        ca_file,
        rule_files,
        extra,
        extras,
        key,
        key_file,
        exclude_file,
    } hidden { cache_file });

    fn class(classifier: &Classifier, name: &str) -> FieldClass {
        classifier.classify_field::<Sample>(name).unwrap()
    }

    #[test]
    fn convention_by_suffix_and_type() {
        let classifier = Classifier::default();
        assert_eq!(class(&classifier, "ca_file"), FieldClass::File);
        assert_eq!(class(&classifier, "rule_files"), FieldClass::Files);
        assert_eq!(class(&classifier, "ca"), FieldClass::Plain);
        // Suffix matches but the type is not a plain string.
        assert_eq!(class(&classifier, "key_file"), FieldClass::Plain);
    }

    #[test]
    fn hidden_fields_are_skipped() {
        let classifier = Classifier::default();
        assert_eq!(class(&classifier, "cache_file"), FieldClass::Skip);
    }

    #[test]
    fn include_makes_field_file_like() {
        let sample = Sample::default();
        let classifier: Classifier = [
            include_field(&sample, "extra").unwrap(),
            include_field(&sample, "extras").unwrap(),
        ]
        .into_iter()
        .collect();
        assert_eq!(class(&classifier, "extra"), FieldClass::File);
        assert_eq!(class(&classifier, "extras"), FieldClass::Files);
    }

    #[test]
    fn exclusion_dominates_inclusion_in_any_order() {
        let sample = Sample::default();
        let exclude = exclude_field(&sample, "exclude_file").unwrap();
        let include = include_field(&sample, "exclude_file").unwrap();

        let a = Classifier::default()
            .with_option(exclude.clone())
            .with_option(include.clone());
        let b = Classifier::default().with_option(include).with_option(exclude);
        assert_eq!(class(&a, "exclude_file"), FieldClass::Plain);
        assert_eq!(class(&b, "exclude_file"), FieldClass::Plain);
    }

    #[test]
    fn overrides_look_through_pointers() {
        let shared = Rc::new(RefCell::new(Sample::default()));
        let wrapped = Some(Sample::default());
        let a = include_field(&shared, "extra").unwrap();
        let b = include_field(&wrapped, "extra").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.record_name(), "Sample");
        assert_eq!(a.field(), "extra");
        assert!(!a.is_exclude());
    }

    #[test]
    fn overrides_reject_non_records() {
        let err = include_field(&vec![String::new()], "nope").unwrap_err();
        assert_eq!(
            err,
            FieldError::NotARecord {
                type_name: "Vec<String>".into(),
                kind: Kind::Sequence,
            }
        );
    }

    #[test]
    fn overrides_reject_unknown_fields() {
        let err = exclude_field(&Sample::default(), "nope").unwrap_err();
        assert_eq!(err.to_string(), "invalid field: \"nope\" not found in Sample");
    }

    #[test]
    fn camel_case_convention() {
        let convention = Convention::camel_case();
        assert!(convention.is_file("CAFile"));
        assert!(convention.is_files("RuleFiles"));
        assert!(!convention.is_file("RuleFiles"));
        assert_eq!(convention.sibling_of("KeyFile"), Some("Key"));
    }

    #[test]
    fn sibling_names() {
        let convention = Convention::default();
        assert_eq!(convention.sibling_of("ca_file"), Some("ca"));
        assert_eq!(convention.sibling_of("_file"), None);
        assert_eq!(convention.sibling_of("ca"), None);
    }

    #[test]
    fn convention_from_documents() {
        let yaml = Convention::from_yaml("file_suffix: Path\nclear_secret_siblings: true\n").unwrap();
        assert_eq!(yaml.file_suffix, "Path");
        assert_eq!(yaml.files_suffix, "_files");
        assert!(yaml.clear_secret_siblings);

        let json = Convention::from_json(r#"{"files_suffix": "Paths"}"#).unwrap();
        assert_eq!(json.file_suffix, "_file");
        assert_eq!(json.files_suffix, "Paths");

        assert!(matches!(
            Convention::from_json("[1, 2"),
            Err(ConventionError::InvalidJson(_))
        ));
    }
}
