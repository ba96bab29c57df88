use crate::client::ArrayClient;
use crate::config::{ArrayCredentials, CredentialStore};
use crate::error::ReportError;
use crate::quota;
use crate::render::{self, OutputFormat};
use std::io::{self, Write};

/// What to report on and how to print it.
#[derive(Debug, Clone)]
pub struct ReportOptions<'a> {
    pub array_name: &'a str,
    /// Query only this filesystem instead of everything the array lists.
    pub filesystem: Option<&'a str>,
    pub user:       Option<&'a str>,
    pub format:     OutputFormat,
}

/// Turn an unknown array name into a reportable error.
pub fn resolve_array<'s>(store: &'s CredentialStore, name: &str) -> Result<&'s ArrayCredentials, ReportError> {
    store
        .resolve(name)
        .ok_or_else(|| ReportError::UnknownArray(name.to_string()))
}

/// Query, normalize, filter and print. Returns the number of rows written.
///
/// Table and CSV rows are written as each filesystem is processed; JSON is
/// buffered into one document. Any listing failure aborts the run.
pub fn run<C, W>(client: &C, opts: &ReportOptions<'_>, out: &mut W) -> Result<usize, ReportError>
where
    C: ArrayClient + ?Sized,
    W: Write,
{
    let filesystems = target_filesystems(client, opts)?;

    if opts.format == OutputFormat::Table {
        writeln!(out, "{}", render::header())?;
    }

    let mut buffered = Vec::new();
    let mut rows = 0;
    for fs in &filesystems {
        let raw = client
            .list_user_usage(std::slice::from_ref(fs))
            .map_err(|source| ReportError::ListUsage {
                array:      opts.array_name.to_string(),
                filesystem: fs.clone(),
                source,
            })?;
        tracing::info!(filesystem = %fs, records = raw.len(), "listed user usage");

        let normalized = raw.iter().map(|r| quota::normalize(r, opts.array_name));
        for rec in quota::filter_user(normalized, opts.user) {
            rows += 1;
            match opts.format {
                OutputFormat::Table => writeln!(out, "{}", render::table_row(&rec))?,
                OutputFormat::Csv   => writeln!(out, "{}", render::csv_row(&rec))?,
                OutputFormat::Json  => buffered.push(rec),
            }
        }
    }

    if opts.format == OutputFormat::Json {
        let snapshot = render::json_snapshot(opts.array_name, &buffered);
        serde_json::to_writer_pretty(&mut *out, &snapshot).map_err(io::Error::from)?;
        writeln!(out)?;
    }
    Ok(rows)
}

/// Print the array's filesystems: one name per line, or a JSON document.
pub fn list_filesystems<C, W>(client: &C, array_name: &str, json: bool, out: &mut W) -> Result<usize, ReportError>
where
    C: ArrayClient + ?Sized,
    W: Write,
{
    let filesystems = client
        .list_filesystems()
        .map_err(|source| ReportError::ListFilesystems { array: array_name.to_string(), source })?;

    if json {
        let doc = render::json_filesystems(array_name, &filesystems);
        serde_json::to_writer_pretty(&mut *out, &doc).map_err(io::Error::from)?;
        writeln!(out)?;
    } else {
        for fs in &filesystems {
            writeln!(out, "{}", fs.name)?;
        }
    }
    Ok(filesystems.len())
}

fn target_filesystems<C>(client: &C, opts: &ReportOptions<'_>) -> Result<Vec<String>, ReportError>
where
    C: ArrayClient + ?Sized,
{
    if let Some(fs) = opts.filesystem {
        return Ok(vec![fs.to_string()]);
    }
    let listed = client
        .list_filesystems()
        .map_err(|source| ReportError::ListFilesystems { array: opts.array_name.to_string(), source })?;
    tracing::info!(array = %opts.array_name, filesystems = listed.len(), "listed filesystems");
    Ok(listed.into_iter().map(|f| f.name).collect())
}
