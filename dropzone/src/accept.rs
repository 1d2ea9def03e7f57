//! File acceptance policy: type, size and cardinality checks.
//!
//! Everything here is synchronous and side-effect free so it can run both
//! while a drag is hovering (probe) and once files are materialized (drop).
use std::fmt;
use std::rc::Rc;

use crate::core::{FileDescriptor, FileError, FileRejection};

#[cfg(feature = "tracing")]
use tracing::trace;

/// Legacy Firefox reports dragged files with this type; always let it through.
const MOZ_FILE_MIME: &str = "application/x-moz-file";

type ValidatorFn = dyn Fn(&FileDescriptor) -> Vec<FileError> + 'static;

/// Host-supplied extra check run on every dropped or picked file.
///
/// Returns an empty list when the file passes.
#[derive(Clone)]
pub struct Validator {
    inner: Rc<ValidatorFn>,
}

impl Validator {
    /// Wrap a validation closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&FileDescriptor) -> Vec<FileError> + 'static,
    {
        Self { inner: Rc::new(f) }
    }

    /// Run the validator on one file.
    pub fn validate(&self, file: &FileDescriptor) -> Vec<FileError> {
        (self.inner)(file)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator").finish_non_exhaustive()
    }
}

/// What a dropzone accepts.
///
/// Examples
/// ```
/// use dropzone::AcceptanceSpec;
/// let spec = AcceptanceSpec::new()
///     .accept(["image/*", ".pdf"])
///     .max_size(5 * 1024 * 1024)
///     .max_files(3);
/// assert!(spec.multiple);
/// ```
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AcceptanceSpec {
    /// MIME types (`image/png`), wildcards (`image/*`) or extensions (`.png`).
    /// `None` accepts everything.
    pub accepted_types: Option<Vec<String>>,
    /// Inclusive lower size bound in bytes.
    pub min_size: u64,
    /// Inclusive upper size bound in bytes (`None` = unbounded).
    pub max_size: Option<u64>,
    /// Allow more than one file per batch.
    pub multiple: bool,
    /// Maximum files per batch when `multiple` is set (0 = unbounded).
    pub max_files: usize,
    /// Optional extra validation.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub validator: Option<Validator>,
}

impl Default for AcceptanceSpec {
    fn default() -> Self {
        Self {
            accepted_types: None,
            min_size: 0,
            max_size: None,
            multiple: true,
            max_files: 0,
            validator: None,
        }
    }
}

impl AcceptanceSpec {
    /// Accept everything, any number of files.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add accepted types. Appends to previously added types.
    pub fn accept<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accepted_types
            .get_or_insert_with(Vec::new)
            .extend(types.into_iter().map(Into::into));
        self
    }

    /// Set the minimum size in bytes.
    pub fn min_size(mut self, bytes: u64) -> Self {
        self.min_size = bytes;
        self
    }

    /// Set the maximum size in bytes.
    pub fn max_size(mut self, bytes: u64) -> Self {
        self.max_size = Some(bytes);
        self
    }

    /// Allow or forbid multi-file batches.
    pub fn multiple(mut self, yes: bool) -> Self {
        self.multiple = yes;
        self
    }

    /// Cap the number of files per batch (0 = no cap).
    pub fn max_files(mut self, n: usize) -> Self {
        self.max_files = n;
        self
    }

    /// Install a custom validator.
    pub fn validator<F>(mut self, f: F) -> Self
    where
        F: Fn(&FileDescriptor) -> Vec<FileError> + 'static,
    {
        self.validator = Some(Validator::new(f));
        self
    }

    /// Render the accepted types as an HTML `accept` attribute.
    pub fn accept_attr(&self) -> Option<String> {
        self.accepted_types.as_ref().map(|types| types.join(","))
    }

    /// Type and size errors for one file, in that order. No custom validation.
    fn policy_errors(&self, file: &FileDescriptor) -> Vec<FileError> {
        let mut errors = Vec::new();
        if !matches_type(file, self.accepted_types.as_deref()) {
            let accepted = self.accepted_types.as_deref().unwrap_or_default();
            errors.push(FileError::invalid_type(accepted));
        }
        if let Some(err) = size_error(file, self.min_size, self.max_size) {
            errors.push(err);
        }
        errors
    }

    /// Every error for one file: type, size, then custom.
    pub fn file_errors(&self, file: &FileDescriptor) -> Vec<FileError> {
        let mut errors = self.policy_errors(file);
        if let Some(v) = &self.validator {
            errors.extend(v.validate(file));
        }
        errors
    }
}

/// Whether `file` matches one of `accepted_types` (`None` or empty = any).
pub fn matches_type(file: &FileDescriptor, accepted_types: Option<&[String]>) -> bool {
    if file.mime_type() == MOZ_FILE_MIME {
        return true;
    }
    let Some(accepted) = accepted_types else {
        return true;
    };
    if accepted.is_empty() {
        return true;
    }
    let name = file.name().to_lowercase();
    let mime = file.mime_type().to_lowercase();
    let base_mime = mime.split('/').next().unwrap_or_default();

    accepted.iter().any(|t| {
        let t = t.trim().to_lowercase();
        if t.starts_with('.') {
            name.ends_with(&t)
        } else if let Some(primary) = t.strip_suffix("/*") {
            base_mime == primary
        } else {
            mime == t
        }
    })
}

/// Whether the file size lies within the inclusive bounds (unknown size passes).
pub fn matches_size(file: &FileDescriptor, min_size: u64, max_size: Option<u64>) -> bool {
    size_error(file, min_size, max_size).is_none()
}

/// Size error for a file; too-large wins when both bounds are violated.
pub fn size_error(file: &FileDescriptor, min_size: u64, max_size: Option<u64>) -> Option<FileError> {
    let size = file.size()?;
    match max_size {
        Some(max) if size > max => Some(FileError::too_large(max)),
        _ if size < min_size => Some(FileError::too_small(min_size)),
        _ => None,
    }
}

/// Whether a batch of `len` files satisfies the single/multiple and max-files policy.
pub fn is_batch_within_cardinality(len: usize, multiple: bool, max_files: usize) -> bool {
    if !multiple && len > 1 {
        return false;
    }
    if multiple && max_files >= 1 && len > max_files {
        return false;
    }
    true
}

/// Accepted/rejected partition of one batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchVerdict {
    /// Files that passed every check, in input order.
    pub accepted: Vec<FileDescriptor>,
    /// Files that failed, in input order.
    pub rejected: Vec<FileRejection>,
}

/// Partition a batch with the full policy, including the custom validator.
///
/// If the accepted subset violates cardinality, every accepted file is demoted
/// with a single too-many-files error; accepted ends up empty.
pub fn evaluate_batch(batch: Vec<FileDescriptor>, spec: &AcceptanceSpec) -> BatchVerdict {
    let mut checked: Vec<(FileDescriptor, Vec<FileError>)> = batch
        .into_iter()
        .map(|file| {
            let errors = spec.file_errors(&file);
            (file, errors)
        })
        .collect();

    let accepted_len = checked.iter().filter(|(_, e)| e.is_empty()).count();
    if !is_batch_within_cardinality(accepted_len, spec.multiple, spec.max_files) {
        for (_, errors) in checked.iter_mut().filter(|(_, e)| e.is_empty()) {
            errors.push(FileError::too_many_files());
        }
    }

    let mut verdict = BatchVerdict::default();
    for (file, errors) in checked {
        if errors.is_empty() {
            verdict.accepted.push(file);
        } else {
            verdict.rejected.push(FileRejection { file, errors });
        }
    }
    trace_verdict(verdict.accepted.len(), verdict.rejected.len());
    verdict
}

/// Drag-time check: cardinality plus type and size, no custom validator.
pub fn probe_batch(batch: &[FileDescriptor], spec: &AcceptanceSpec) -> bool {
    if !is_batch_within_cardinality(batch.len(), spec.multiple, spec.max_files) {
        return false;
    }
    batch.iter().all(|f| spec.policy_errors(f).is_empty())
}

#[cfg(feature = "tracing")]
fn trace_verdict(accepted: usize, rejected: usize) {
    trace!(accepted, rejected, "batch evaluated");
}

#[cfg(not(feature = "tracing"))]
fn trace_verdict(_accepted: usize, _rejected: usize) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ErrorCode, RawFile};
    use pretty_assertions::assert_eq;

    fn file(name: &str, size: u64) -> FileDescriptor {
        FileDescriptor::from_raw(RawFile::new(name, size))
    }

    fn typed(name: &str, mime: &str) -> FileDescriptor {
        FileDescriptor::from_raw(RawFile::new(name, 1).with_mime_type(mime))
    }

    fn types(t: &[&str]) -> Vec<String> {
        t.iter().map(|s| s.to_string()).collect()
    }

    fn codes(r: &FileRejection) -> Vec<ErrorCode> {
        r.errors.iter().map(|e| e.code.clone()).collect()
    }

    #[test]
    fn no_accepted_types_accepts_anything() {
        assert!(matches_type(&typed("x", "text/plain"), None));
        assert!(matches_type(&typed("x", "text/plain"), Some(&[])));
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let accepted = types(&[".JPG"]);
        assert!(matches_type(&file("a.jpg", 1), Some(&accepted)));
        assert!(!matches_type(&file("a.png", 1), Some(&accepted)));
    }

    #[test]
    fn wildcard_matches_primary_type() {
        let accepted = types(&["image/*"]);
        assert!(matches_type(&typed("a", "image/png"), Some(&accepted)));
        assert!(!matches_type(&typed("a", "text/plain"), Some(&accepted)));
    }

    #[test]
    fn exact_mime_is_case_insensitive_and_trimmed() {
        let accepted = types(&[" Application/PDF "]);
        assert!(matches_type(&typed("a", "application/pdf"), Some(&accepted)));
    }

    #[test]
    fn moz_file_is_always_accepted() {
        let accepted = types(&[".png"]);
        assert!(matches_type(
            &typed("whatever", "application/x-moz-file"),
            Some(&accepted)
        ));
    }

    #[test]
    fn unknown_size_passes_size_check() {
        let f = FileDescriptor::probe("image/png");
        assert!(matches_size(&f, 10, Some(20)));
    }

    #[test]
    fn size_bounds_are_inclusive() {
        assert!(matches_size(&file("a", 10), 10, Some(10)));
        assert!(!matches_size(&file("a", 11), 0, Some(10)));
        assert!(!matches_size(&file("a", 9), 10, None));
    }

    #[test]
    fn too_large_wins_over_too_small() {
        let err = size_error(&file("a", 100), 50, Some(10)).unwrap();
        assert_eq!(err.code, ErrorCode::TooLarge);
    }

    #[test]
    fn cardinality_rules() {
        assert!(is_batch_within_cardinality(1, false, 0));
        assert!(!is_batch_within_cardinality(2, false, 0));
        assert!(is_batch_within_cardinality(5, true, 0));
        assert!(is_batch_within_cardinality(2, true, 2));
        assert!(!is_batch_within_cardinality(3, true, 2));
    }

    #[test]
    fn too_many_files_demotes_the_whole_batch() {
        let spec = AcceptanceSpec::new().multiple(true).max_files(2);
        let v = evaluate_batch(vec![file("a", 1), file("b", 1), file("c", 1)], &spec);
        assert!(v.accepted.is_empty());
        assert_eq!(v.rejected.len(), 3);
        for r in &v.rejected {
            assert_eq!(codes(r), vec![ErrorCode::TooManyFiles]);
        }
    }

    #[test]
    fn single_mode_rejects_two_valid_files() {
        let spec = AcceptanceSpec::new().multiple(false);
        let v = evaluate_batch(vec![file("a", 1), file("b", 1)], &spec);
        assert!(v.accepted.is_empty());
        assert_eq!(v.rejected.len(), 2);
    }

    #[test]
    fn single_mode_keeps_one_valid_file_next_to_invalid_ones() {
        let spec = AcceptanceSpec::new().multiple(false).accept([".txt"]);
        let v = evaluate_batch(vec![file("a.png", 1), file("b.txt", 1)], &spec);
        assert_eq!(v.accepted, vec![file("b.txt", 1)]);
        assert_eq!(codes(&v.rejected[0]), vec![ErrorCode::InvalidType]);
    }

    #[test]
    fn rejections_keep_input_order_after_demotion() {
        let spec = AcceptanceSpec::new().accept([".txt"]).max_files(1);
        let v = evaluate_batch(
            vec![file("a.txt", 1), file("b.png", 1), file("c.txt", 1)],
            &spec,
        );
        let names: Vec<&str> = v.rejected.iter().map(|r| r.file.name()).collect();
        assert_eq!(names, vec!["a.txt", "b.png", "c.txt"]);
        assert_eq!(codes(&v.rejected[0]), vec![ErrorCode::TooManyFiles]);
        assert_eq!(codes(&v.rejected[1]), vec![ErrorCode::InvalidType]);
    }

    #[test]
    fn errors_accumulate_type_size_then_custom() {
        let spec = AcceptanceSpec::new()
            .accept(["image/*"])
            .max_size(10)
            .validator(|f| {
                if f.name().starts_with("bad") {
                    vec![FileError::custom("name-bad", "bad name")]
                } else {
                    Vec::new()
                }
            });
        let v = evaluate_batch(vec![typed("bad.txt", "text/plain")], &spec);
        let v2 = evaluate_batch(vec![file("bad.txt", 100)], &spec);
        assert_eq!(
            codes(&v.rejected[0]),
            vec![ErrorCode::InvalidType, ErrorCode::Custom("name-bad".into())]
        );
        assert_eq!(
            codes(&v2.rejected[0]),
            vec![
                ErrorCode::InvalidType,
                ErrorCode::TooLarge,
                ErrorCode::Custom("name-bad".into())
            ]
        );
    }

    #[test]
    fn single_file_accepted_iff_all_checks_pass() {
        let spec = AcceptanceSpec::new()
            .accept([".txt"])
            .min_size(2)
            .max_size(8)
            .validator(|f| {
                if f.size() == Some(5) {
                    vec![FileError::custom("five", "no fives")]
                } else {
                    Vec::new()
                }
            });
        let cases = [
            ("a.txt", 4, true),
            ("a.txt", 5, false),
            ("a.txt", 1, false),
            ("a.txt", 9, false),
            ("a.md", 4, false),
        ];
        for (name, size, ok) in cases {
            let v = evaluate_batch(vec![file(name, size)], &spec);
            assert_eq!(!v.accepted.is_empty(), ok, "{name} {size}");
            assert_eq!(v.accepted.len() + v.rejected.len(), 1);
        }
    }

    #[test]
    fn probe_ignores_custom_validator() {
        let spec = AcceptanceSpec::new()
            .accept(["image/*"])
            .validator(|_| vec![FileError::custom("never", "never")]);
        assert!(probe_batch(&[FileDescriptor::probe("image/png")], &spec));
        assert!(!probe_batch(&[FileDescriptor::probe("text/plain")], &spec));
    }

    #[test]
    fn probe_checks_cardinality_of_the_whole_batch() {
        let spec = AcceptanceSpec::new().multiple(false);
        let items = [
            FileDescriptor::probe("image/png"),
            FileDescriptor::probe("image/png"),
        ];
        assert!(!probe_batch(&items, &spec));
    }

    #[test]
    fn accept_attr_joins_types() {
        let spec = AcceptanceSpec::new().accept(["image/*", ".pdf"]);
        assert_eq!(spec.accept_attr().as_deref(), Some("image/*,.pdf"));
        assert_eq!(AcceptanceSpec::new().accept_attr(), None);
    }
}
