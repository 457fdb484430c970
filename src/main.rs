use changedesk::cli::run;
use changedesk::session::SessionError;

/// Unreadable or corrupt local files are internal errors; everything else
/// (rejected requests, bad input, not logged in) is the user's to fix.
fn is_internal(e: &anyhow::Error) -> bool {
    e.chain().any(|cause| {
        cause.downcast_ref::<SessionError>().is_some_and(SessionError::is_internal)
            || cause.downcast_ref::<std::io::Error>().is_some()
    })
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let _ = enable_ansi_support::enable_ansi_support();

    if let Err(e) = run() {
        if is_internal(&e) {
            eprintln!("Internal error: {}", e);
            // Show error chain if available
            let mut source = e.source();
            if source.is_some() {
                eprintln!("\nCaused by:");
                let mut indent = 1;
                while let Some(err) = source {
                    eprintln!("{:indent$}  {}", "", err);
                    source = err.source();
                    indent += 1;
                }
            }
            std::process::exit(2);
        } else {
            // User error
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
