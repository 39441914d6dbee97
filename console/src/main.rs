//! `pawstay`: drive the console request layer from the command line.
//!
//! Settings come from `PAWSTAY_*` environment variables (see
//! [`ClientSettings`]). With `PAWSTAY_USE_MOCK_API=true` admin calls are
//! answered by the simulated backend.
//!
//! # Examples
//! ```sh
//! PAWSTAY_USE_MOCK_API=true pawstay login --email admin@pawstay.kr --password pw
//! pawstay request GET '/api/admin/promotions?page=2&limit=5'
//! pawstay upload /api/partner/documents --field documentType=business_registration --file file=reg.pdf
//! ```
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use pawstay_console::domain::{
    ApiEnvelope, ApiRequest, HttpMethod, LoginCredentials, MultipartForm, Portal,
};
use pawstay_console::{ClientSettings, ConsoleRuntime};
use serde_json::Value;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// `pawstay` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "pawstay",
    about = "Issue authenticated requests against the Pawstay admin API",
    version
)]
struct CliArgs {
    /// Page the client acts from, e.g. `/admin/promotions` or `/partner`.
    #[arg(long, global = true, value_name = "path")]
    page: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Send a JSON request.
    Request {
        /// HTTP method.
        method: String,
        /// Origin-relative path or absolute URL.
        path: String,
        /// JSON body.
        #[arg(long, value_name = "json")]
        data: Option<String>,
    },
    /// Send a multipart upload.
    Upload {
        /// Origin-relative path or absolute URL.
        path: String,
        /// Text field as `name=value`.
        #[arg(long = "field", value_name = "name=value", value_parser = parse_pair)]
        fields: Vec<(String, String)>,
        /// File field as `name=path`.
        #[arg(long = "file", value_name = "name=path", value_parser = parse_pair)]
        files: Vec<(String, String)>,
    },
    /// Sign in and persist the session.
    Login {
        /// Login email.
        #[arg(long)]
        email: String,
        /// Password.
        #[arg(long)]
        password: String,
        /// Portal to sign in to.
        #[arg(long, value_enum, default_value_t = PortalArg::Admin)]
        portal: PortalArg,
    },
    /// Clear the session.
    Logout,
    /// Show the signed-in user.
    Whoami,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PortalArg {
    Admin,
    Partner,
}

impl From<PortalArg> for Portal {
    fn from(value: PortalArg) -> Self {
        match value {
            PortalArg::Admin => Self::Admin,
            PortalArg::Partner => Self::Partner,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let mut settings = ClientSettings::load_from_iter([OsString::from("pawstay")])
        .map_err(|error| eyre!("load settings: {error}"))?;
    if let Some(page) = args.page {
        settings.current_path = Some(page);
    }
    let runtime = ConsoleRuntime::from_settings(&settings).wrap_err("build console runtime")?;

    let envelope = match args.command {
        Command::Request { method, path, data } => {
            let method = HttpMethod::parse(&method)
                .ok_or_else(|| eyre!("unsupported HTTP method {method:?}"))?;
            let mut request = ApiRequest::new(method, path);
            if let Some(raw) = data {
                let body: Value = serde_json::from_str(&raw).wrap_err("parse --data as JSON")?;
                request = request.json(body);
            }
            runtime.client().request(request).await
        }
        Command::Upload {
            path,
            fields,
            files,
        } => {
            let form = build_form(fields, files)?;
            runtime.client().upload(&path, form).await
        }
        Command::Login {
            email,
            password,
            portal,
        } => {
            let credentials = LoginCredentials::try_from_parts(&email, &password)?;
            runtime
                .auth()
                .login(&credentials, portal.into())
                .await
                .try_map(serde_json::to_value)?
        }
        Command::Logout => {
            runtime.auth().logout();
            ApiEnvelope::ok(Value::Null)
        }
        Command::Whoami => match runtime.auth().current_user() {
            Some(user) => ApiEnvelope::ok(serde_json::to_value(user)?),
            None => ApiEnvelope::failure("Unauthorized", "not signed in"),
        },
    };

    runtime.teardown().settled().await;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", serde_json::to_string_pretty(&envelope)?)?;
    writeln!(stdout, "page={}", runtime.current_path())?;
    Ok(())
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got {raw:?}"))?;
    if name.trim().is_empty() {
        return Err("field name must not be empty".to_owned());
    }
    Ok((name.trim().to_owned(), value.to_owned()))
}

fn build_form(fields: Vec<(String, String)>, files: Vec<(String, String)>) -> Result<MultipartForm> {
    let form = fields
        .into_iter()
        .fold(MultipartForm::new(), |form, (name, value)| form.text(name, value));
    files.into_iter().try_fold(form, |form, (name, path)| {
        let path = PathBuf::from(path);
        let bytes = read_file(&path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content_type = content_type_for(&path);
        Ok(form.file(name, file_name, content_type, bytes))
    })
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| eyre!("upload path {} is not a file", path.display()))?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority())
        .wrap_err_with(|| format!("open directory {}", parent.display()))?;
    let mut file = directory
        .open(Path::new(file_name))
        .wrap_err_with(|| format!("open {}", path.display()))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .wrap_err_with(|| format!("read {}", path.display()))?;
    Ok(bytes)
}

fn content_type_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "pdf" => Some("application/pdf"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for CLI parsing helpers.

    use std::io::Write;

    use rstest::rstest;
    use tempfile::NamedTempFile;

    use super::*;

    #[rstest]
    #[case("documentType=bank_account", ("documentType", "bank_account"))]
    #[case("note=a=b", ("note", "a=b"))]
    #[case(" name =", ("name", ""))]
    fn pairs_split_on_the_first_equals(#[case] raw: &str, #[case] expected: (&str, &str)) {
        let (name, value) = parse_pair(raw).expect("pair should parse");
        assert_eq!((name.as_str(), value.as_str()), expected);
    }

    #[rstest]
    #[case("no-separator")]
    #[case("=value")]
    fn malformed_pairs_are_rejected(#[case] raw: &str) {
        assert!(parse_pair(raw).is_err());
    }

    #[rstest]
    #[case("reg.PDF", Some("application/pdf"))]
    #[case("avatar.jpeg", Some("image/jpeg"))]
    #[case("notes.txt", None)]
    #[case("README", None)]
    fn content_types_follow_the_extension(#[case] path: &str, #[case] expected: Option<&str>) {
        assert_eq!(content_type_for(Path::new(path)), expected);
    }

    #[rstest]
    fn forms_carry_text_fields_before_files() {
        let mut file = NamedTempFile::with_suffix(".pdf").expect("temp file");
        file.write_all(b"%PDF-1.7").expect("write temp file");
        let path = file.path().display().to_string();

        let form = build_form(
            vec![("documentType".to_owned(), "business_registration".to_owned())],
            vec![("file".to_owned(), path)],
        )
        .expect("form should build");

        assert_eq!(form.field_names(), ["documentType", "file"]);
    }

    #[rstest]
    fn missing_upload_files_are_reported() {
        let error = build_form(Vec::new(), vec![("file".to_owned(), "/nonexistent/x.pdf".to_owned())])
            .expect_err("missing file should fail");
        assert!(error.to_string().contains("/nonexistent"));
    }

    #[rstest]
    fn subcommands_parse() {
        let args = CliArgs::try_parse_from([
            "pawstay",
            "--page",
            "/partner",
            "login",
            "--email",
            "kim@pawstay.kr",
            "--password",
            "pw",
            "--portal",
            "partner",
        ])
        .expect("arguments should parse");
        assert_eq!(args.page.as_deref(), Some("/partner"));
        assert!(matches!(
            args.command,
            Command::Login {
                portal: PortalArg::Partner,
                ..
            }
        ));
    }
}
