//! # Generate Subcommand
//!
//! Builds ELMv3 credentials from a platform directory fixture, the same
//! way the HTTP endpoint does, and writes them to disk.
//!
//! With `--username`, writes one credential as JSON. Without it, writes a
//! ZIP of every enrolled non-staff learner holding a certificate.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use elmcred_core::{
    archive_filename, credential_filename, CourseKey, InMemoryDirectory, PlatformDirectory,
    Timestamp,
};
use elmcred_vc::{CredentialArchive, CredentialBuilder, ElmDefaults};

/// Arguments for the `elmcred generate` subcommand.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Platform directory fixture (YAML or JSON).
    #[arg(long)]
    pub directory: PathBuf,

    /// Course key, e.g. course-v1:edX+DemoX+Demo_Course.
    #[arg(long)]
    pub course: String,

    /// Learner username or email. Omit to generate the whole course.
    #[arg(long)]
    pub username: Option<String>,

    /// Expiry date written to validUntil and expirationDate.
    #[arg(long)]
    pub expires_at: Option<String>,

    /// ELM settings file (YAML). Built-in defaults apply when omitted.
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Output file or directory. Defaults to the current directory.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Run the generate subcommand and return the path written.
pub fn run_generate(args: &GenerateArgs) -> Result<PathBuf> {
    let directory = InMemoryDirectory::load(&args.directory).with_context(|| {
        format!("failed to load platform directory {}", args.directory.display())
    })?;

    let defaults = match &args.settings {
        Some(path) => ElmDefaults::load(path)
            .with_context(|| format!("failed to load ELM settings {}", path.display()))?,
        None => ElmDefaults::default(),
    };

    let key = CourseKey::parse(&args.course)
        .with_context(|| format!("invalid course key: {}", args.course))?;
    let Some(course) = directory.get_course(&key) else {
        bail!("course not found: {}", args.course);
    };

    let expires_at = args
        .expires_at
        .as_deref()
        .map(Timestamp::parse_flexible)
        .transpose()
        .context("invalid --expires-at")?;

    match args.username.as_deref().filter(|u| !u.trim().is_empty()) {
        Some(username) => {
            let Some(user) = directory.find_user(username) else {
                bail!("user not found: {username}");
            };
            let Some(certificate) = directory.certificate_for(&user, &key) else {
                bail!("{username} has no certificate for {}", key.as_str());
            };

            let json = CredentialBuilder::new(&course, &user, &certificate, &defaults)
                .expires_at(expires_at)
                .build()
                .to_json_pretty()?;

            let path = resolve_output(
                args.output.as_deref(),
                &credential_filename(user.username.as_str(), key.as_str()),
            );
            std::fs::write(&path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), username = %user.username, "wrote credential");
            Ok(path)
        }
        None => {
            let mut archive = CredentialArchive::new();
            for learner in directory.enrolled_learners(&key) {
                let Some(certificate) = directory.certificate_for(&learner, &key) else {
                    tracing::debug!(username = %learner.username, "skipping learner without certificate");
                    continue;
                };
                let credential = CredentialBuilder::new(&course, &learner, &certificate, &defaults)
                    .expires_at(expires_at)
                    .build();
                archive.add_credential(learner.username.as_str(), key.as_str(), &credential)?;
            }

            if archive.is_empty() {
                bail!("no credentials found for {}", key.as_str());
            }

            let count = archive.len();
            let path = resolve_output(args.output.as_deref(), &archive_filename(key.as_str()));
            let bytes = archive.finish()?;
            std::fs::write(&path, bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), count, "wrote credential archive");
            Ok(path)
        }
    }
}

/// An existing directory receives the default filename; anything else is
/// taken as the file path.
fn resolve_output(output: Option<&Path>, default_name: &str) -> PathBuf {
    match output {
        Some(path) if path.is_dir() => path.join(default_name),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(default_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    const FIXTURE: &str = r#"
courses:
  - key: "course-v1:edX+DemoX+Demo_Course"
    display_name: Demo Course
  - key: "course-v1:edX+Empty+2024"
    display_name: Empty Course
users:
  - username: john_doe
    email: john@example.com
    full_name: John Doe
  - username: jane_roe
    email: jane@example.com
    full_name: Jane Roe
  - username: no_cert
    email: nocert@example.com
    full_name: No Cert
enrollments:
  - course: "course-v1:edX+DemoX+Demo_Course"
    username: john_doe
  - course: "course-v1:edX+DemoX+Demo_Course"
    username: jane_roe
  - course: "course-v1:edX+DemoX+Demo_Course"
    username: no_cert
certificates:
  - username: john_doe
    course_key: "course-v1:edX+DemoX+Demo_Course"
    created_date: "2024-03-01T10:00:00Z"
    grade: "0.9"
  - username: jane_roe
    course_key: "course-v1:edX+DemoX+Demo_Course"
    created_date: "2024-03-02T10:00:00Z"
    grade: "0.8"
"#;

    fn setup() -> (tempfile::TempDir, PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        let fixture = tmp.path().join("platform.yaml");
        std::fs::write(&fixture, FIXTURE).unwrap();
        (tmp, fixture)
    }

    fn args(directory: PathBuf, course: &str) -> GenerateArgs {
        GenerateArgs {
            directory,
            course: course.to_string(),
            username: None,
            expires_at: None,
            settings: None,
            output: None,
        }
    }

    #[test]
    fn single_credential_written_into_output_dir() {
        let (tmp, fixture) = setup();
        let mut a = args(fixture, "course-v1:edX+DemoX+Demo_Course");
        a.username = Some("john@example.com".into());
        a.expires_at = Some("2030-01-01".into());
        a.output = Some(tmp.path().to_path_buf());

        let path = run_generate(&a).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "credential-john_doe-course-v1:edX+DemoX+Demo_Course.json"
        );

        let doc: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(doc["credential"]["validUntil"], "2030-01-01T00:00:00+00:00");
        assert!(doc["credential"]["id"]
            .as_str()
            .unwrap()
            .starts_with("urn:credential:"));
    }

    #[test]
    fn explicit_output_file_is_used() {
        let (tmp, fixture) = setup();
        let target = tmp.path().join("out.json");
        let mut a = args(fixture, "course-v1:edX+DemoX+Demo_Course");
        a.username = Some("jane_roe".into());
        a.output = Some(target.clone());

        assert_eq!(run_generate(&a).unwrap(), target);
        assert!(target.exists());
    }

    #[test]
    fn course_archive_contains_certified_learners() {
        let (tmp, fixture) = setup();
        let mut a = args(fixture, "course-v1:edX+DemoX+Demo_Course");
        a.output = Some(tmp.path().to_path_buf());

        let path = run_generate(&a).unwrap();
        assert!(path.to_str().unwrap().ends_with(".zip"));

        let file = std::fs::File::open(&path).unwrap();
        let mut zip = zip::ZipArchive::new(file).unwrap();
        assert_eq!(zip.len(), 2);
        let names: Vec<String> = (0..zip.len())
            .map(|i| zip.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "credential-jane_roe-course-v1:edX+DemoX+Demo_Course.json",
                "credential-john_doe-course-v1:edX+DemoX+Demo_Course.json",
            ]
        );

        let mut body = String::new();
        zip.by_index(0).unwrap().read_to_string(&mut body).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(doc["credential"].is_object());
    }

    #[test]
    fn empty_course_is_an_error() {
        let (tmp, fixture) = setup();
        let mut a = args(fixture, "course-v1:edX+Empty+2024");
        a.output = Some(tmp.path().to_path_buf());
        let err = run_generate(&a).unwrap_err();
        assert!(format!("{err:#}").contains("no credentials found"));
    }

    #[test]
    fn learner_without_certificate_is_an_error() {
        let (_tmp, fixture) = setup();
        let mut a = args(fixture, "course-v1:edX+DemoX+Demo_Course");
        a.username = Some("no_cert".into());
        let err = run_generate(&a).unwrap_err();
        assert!(format!("{err:#}").contains("has no certificate"));
    }

    #[test]
    fn unknown_course_and_bad_key_are_errors() {
        let (_tmp, fixture) = setup();
        let err = run_generate(&args(fixture.clone(), "course-v1:edX+Nope+1")).unwrap_err();
        assert!(format!("{err:#}").contains("course not found"));

        let err = run_generate(&args(fixture, "not a key")).unwrap_err();
        assert!(format!("{err:#}").contains("invalid course key"));
    }

    #[test]
    fn bad_expiry_is_an_error() {
        let (_tmp, fixture) = setup();
        let mut a = args(fixture, "course-v1:edX+DemoX+Demo_Course");
        a.username = Some("john_doe".into());
        a.expires_at = Some("not-a-date".into());
        let err = run_generate(&a).unwrap_err();
        assert!(format!("{err:#}").contains("--expires-at"));
    }

    #[test]
    fn missing_directory_file_is_an_error() {
        let err = run_generate(&args(
            PathBuf::from("/nonexistent/platform.yaml"),
            "course-v1:edX+DemoX+Demo_Course",
        ))
        .unwrap_err();
        assert!(format!("{err:#}").contains("failed to load platform directory"));
    }
}
