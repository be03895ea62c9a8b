use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::db::queries::{employee_name, load_events_for_dates};
use crate::errors::{AppError, AppResult};
use crate::utils::colors::colorize_in_out;
use crate::utils::date;
use crate::utils::formatting::pad_right;

/// Handle the `list` command: dump recorded clock events for a period.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::List {
        period,
        today,
        json,
    } = cmd
    else {
        return Ok(());
    };

    let dates = if *today {
        vec![date::today()]
    } else if let Some(p) = period {
        if let Some((start, end)) = p.split_once(':') {
            date::generate_range(start, end).map_err(AppError::InvalidDate)?
        } else {
            date::generate_from_period(p).map_err(AppError::InvalidDate)?
        }
    } else {
        vec![date::today()]
    };

    let mut pool = DbPool::new(&cfg.database)?;
    let events = load_events_for_dates(&mut pool, &dates)?;

    if *json {
        println!("{}", serde_json::to_string_pretty(&events).unwrap_or_default());
        return Ok(());
    }

    if events.is_empty() {
        println!("No events recorded for the requested period.");
        return Ok(());
    }

    let mut rows = Vec::new();
    for ev in &events {
        let name = employee_name(&pool.conn, ev.employee_id)
            .unwrap_or_else(|_| format!("#{}", ev.employee_id));
        rows.push((ev, name));
    }

    let name_w = rows.iter().map(|(_, n)| n.len()).max().unwrap().max(8);

    println!(
        "{} {} {}  {} {}  FLAGS",
        pad_right("DATE", 10),
        pad_right("TIME", 5),
        pad_right("KIND", 4),
        pad_right("EMPLOYEE", name_w),
        pad_right("RULE", 11),
    );

    for (ev, name) in rows {
        let kind = colorize_in_out(ev.kind.to_db_str(), ev.kind.is_in());
        let mut flags = ev.flags.join(",");
        if ev.geofence_ok == Some(false) {
            if !flags.is_empty() {
                flags.push(',');
            }
            flags.push_str("geofence");
        }

        println!(
            "{} {} {}   {} {}  {}",
            ev.date_str(),
            ev.time_str(),
            kind,
            pad_right(&name, name_w),
            pad_right(&ev.rule, 11),
            flags
        );
    }

    Ok(())
}
