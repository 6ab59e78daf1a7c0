use crate::domain::models::JsonOut;
use crate::forest::ForestError;
use crate::services::policy::DepthError;
use crate::services::settings::RegistryError;
use serde::Serialize;

pub fn print_out<T: Serialize>(
    json: bool,
    data: &[T],
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        for d in data {
            println!("{}", row(d));
        }
    }
    Ok(())
}

pub fn print_one<T: Serialize>(json: bool, data: T, row: impl Fn(&T) -> String) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        println!("{}", row(&data));
    }
    Ok(())
}

/// Like `print_one`, but lets the caller mark the envelope as not-ok while
/// still emitting the report (doctor-style commands).
pub fn print_report<T: Serialize>(
    json: bool,
    ok: bool,
    data: T,
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&JsonOut { ok, data })?);
    } else {
        println!("{}", row(&data));
    }
    Ok(())
}

/// Failure envelope: `{ok: false, error: {code, message}}` on stdout for
/// `--json`, a plain line on stderr otherwise. The caller exits non-zero.
pub fn print_error(json: bool, err: &anyhow::Error) {
    if json {
        let body = serde_json::json!({
            "ok": false,
            "error": {
                "code": error_code(err),
                "message": err.to_string(),
            }
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("error: {}", err);
    }
}

fn error_code(err: &anyhow::Error) -> &'static str {
    if let Some(e) = err.downcast_ref::<DepthError>() {
        return match e {
            DepthError::TooDeep { .. } => "TOO_DEEP",
        };
    }
    if let Some(e) = err.downcast_ref::<ForestError>() {
        return match e {
            ForestError::TermNotFound(_) => "TERM_NOT_FOUND",
            ForestError::ParentNotFound(_) => "PARENT_NOT_FOUND",
            ForestError::DuplicateSlug(_) => "DUPLICATE_SLUG",
            ForestError::WouldCycle(_, _) => "WOULD_CYCLE",
        };
    }
    if let Some(e) = err.downcast_ref::<RegistryError>() {
        return match e {
            RegistryError::UnknownTaxonomy(_) => "UNKNOWN_TAXONOMY",
            RegistryError::NotHierarchical(_) => "NOT_HIERARCHICAL",
        };
    }
    "ERROR"
}
