use crate::cli::parser::{Commands, EmployeeCmd};
use crate::config::Config;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{insert_employee, list_employees, set_employee_status};
use crate::errors::AppResult;
use crate::models::employee::{Employee, EmployeeStatus};
use crate::ui::messages::success;
use crate::utils::formatting::pad_right;

/// Handle the `employee` subcommand: the minimal registry backing the
/// DNI-fragment lookup of the clock commands.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Employee { action } = cmd else {
        return Ok(());
    };

    let mut pool = DbPool::new(&cfg.database)?;

    match action {
        EmployeeCmd::Add { dni, name } => {
            let emp = Employee::new(0, dni.clone(), name.clone());
            insert_employee(&pool.conn, &emp)?;

            ttlog(
                &pool.conn,
                "employee_add",
                dni,
                &format!("Registered employee {}", name),
            )?;
            success(format!("Employee '{}' registered with DNI {}.", name, dni));
        }

        EmployeeCmd::List => {
            let employees = list_employees(&mut pool)?;

            if employees.is_empty() {
                println!("No employees registered yet.");
                return Ok(());
            }

            let name_w = employees.iter().map(|e| e.name.len()).max().unwrap().max(4);
            let dni_w = employees.iter().map(|e| e.dni.len()).max().unwrap().max(3);

            println!(
                "{} {} STATUS",
                pad_right("NAME", name_w),
                pad_right("DNI", dni_w)
            );
            for e in employees {
                println!(
                    "{} {} {}",
                    pad_right(&e.name, name_w),
                    pad_right(&e.dni, dni_w),
                    e.status.to_db_str()
                );
            }
        }

        EmployeeCmd::Off { dni } => {
            set_employee_status(&pool.conn, dni, EmployeeStatus::Inactive)?;

            ttlog(
                &pool.conn,
                "employee_off",
                dni,
                "Employee deactivated",
            )?;
            success(format!("Employee with DNI {} deactivated.", dni));
        }
    }

    Ok(())
}
