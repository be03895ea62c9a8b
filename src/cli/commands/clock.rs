use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::classifier::RequiredAction;
use crate::core::clock::{ClockLogic, ClockRequest};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::event_kind::EventKind;
use crate::models::geofence::{CallerRole, GeoPoint};
use crate::models::justification::JustificationCategory;
use crate::models::message_key::MessageKey;
use crate::ui::catalog;
use crate::ui::messages::{info, success, warning};
use crate::utils::formatting::mins2readable;
use crate::utils::time::parse_datetime;

/// Handle the `in` / `out` commands: the reference handler layer around
/// the classification engine.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let req = match cmd {
        Commands::In {
            who,
            at,
            lat,
            lon,
            admin,
            justify,
            category,
            authorized_by,
        } => build_request(
            cfg,
            who,
            EventKind::In,
            at.as_deref(),
            *lat,
            *lon,
            *admin,
            justify.clone(),
            category.as_deref(),
            None,
            authorized_by.clone(),
        )?,
        Commands::Out {
            who,
            at,
            lat,
            lon,
            admin,
            justify,
            category,
            task,
            authorized_by,
        } => build_request(
            cfg,
            who,
            EventKind::Out,
            at.as_deref(),
            *lat,
            *lon,
            *admin,
            justify.clone(),
            category.as_deref(),
            task.clone(),
            authorized_by.clone(),
        )?,
        _ => return Ok(()),
    };

    let policy = cfg.load_policy()?;
    let mut pool = DbPool::new(&cfg.database)?;

    let outcome = ClockLogic::apply(&mut pool, &policy, &req)?;

    //
    // Outcome → console. Policy outcomes are terminal values, never
    // process failures: the exit code stays 0.
    //
    let prose = catalog::message(outcome.key);

    if let Some(action) = outcome.missing {
        let hint = match action {
            RequiredAction::Justification => "re-run with --justify \"<reason>\"",
            RequiredAction::TaskNote => "re-run with --task \"<what you worked on>\"",
            RequiredAction::Authorization => "re-run with --authorized-by \"<manager>\"",
        };
        warning(format!("{} ({})", prose, hint));
        return Ok(());
    }

    if !outcome.recorded {
        warning(prose);
        return Ok(());
    }

    match outcome.key {
        MessageKey::Early | MessageKey::OnTime | MessageKey::OnTimeOut => {
            success(format!("{} ({})", prose, outcome.employee.name))
        }
        _ => warning(format!("{} ({})", prose, outcome.employee.name)),
    }

    if let Some(c) = outcome.classification {
        info(format!(
            "Rule {} at {} (delta {})",
            c.rule.as_str(),
            outcome.when.format("%Y-%m-%d %H:%M"),
            mins2readable(c.delta_minutes, true, true)
        ));
    }

    if outcome.orphan {
        warning(catalog::message(MessageKey::OrphanCheckout));
    }

    if outcome.notice {
        warning(catalog::message(MessageKey::ThreeLatesNotice));
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn build_request(
    cfg: &Config,
    who: &str,
    kind: EventKind,
    at: Option<&str>,
    lat: Option<f64>,
    lon: Option<f64>,
    admin: bool,
    justify: Option<String>,
    category: Option<&str>,
    task: Option<String>,
    authorized_by: Option<String>,
) -> AppResult<ClockRequest> {
    let at = match at {
        Some(raw) => {
            Some(parse_datetime(raw).ok_or_else(|| AppError::InvalidTime(raw.to_string()))?)
        }
        None => None,
    };

    let point = match (lat, lon) {
        (Some(lat), Some(lon)) => {
            if lat.abs() > 90.0 || lon.abs() > 180.0 {
                return Err(AppError::InvalidCoordinate(format!("{lat},{lon}")));
            }
            Some(GeoPoint::new(lat, lon))
        }
        (None, None) => None,
        _ => {
            return Err(AppError::InvalidCoordinate(
                "--lat and --lon must be given together".to_string(),
            ));
        }
    };

    let category = match category {
        Some(code) => Some(
            JustificationCategory::from_code(code)
                .ok_or_else(|| AppError::InvalidCategory(code.to_string()))?,
        ),
        None => None,
    };

    Ok(ClockRequest {
        fragment: who.to_string(),
        kind,
        at,
        point,
        role: if admin {
            CallerRole::Admin
        } else {
            CallerRole::Public
        },
        justification: justify,
        category,
        task_note: task,
        authorized_by,
        source: cfg.default_source.clone(),
    })
}
