//! Demo entry point.
//!
//! Opens `enrollment.sqlite3` in the working directory, runs the fixed
//! enrollment demo and prints its lines to stdout. Takes no arguments.

use enrollment_core::db::open_db;
use enrollment_core::{
    core_version, default_log_level, init_logging, run_demo, EnrollmentService,
    SqliteEnrollmentRepository,
};
use log::info;
use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

const DB_FILE_NAME: &str = "enrollment.sqlite3";
const LOG_DIR_NAME: &str = "logs";

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let work_dir = std::env::current_dir()?;
    let log_dir: PathBuf = work_dir.join(LOG_DIR_NAME);
    // Demo output does not depend on logging.
    if let Err(err) = init_logging(default_log_level(), &log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }

    let conn = open_db(work_dir.join(DB_FILE_NAME))?;
    let service = EnrollmentService::new(SqliteEnrollmentRepository::try_new(&conn)?);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let report = run_demo(&service, &mut out)?;
    out.flush()?;

    info!(
        "event=demo_run module=cli status=ok version={} subject_id={} students={}",
        core_version(),
        report.subject_id,
        report.student_ids.len()
    );
    Ok(())
}
