/// Print a progress line to the terminal and mirror it into output.log.
#[macro_export]
macro_rules! print_and_log {
    ($($arg:tt)*) => {{
        println!($($arg)*);

        use std::io::Write;
        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("output.log")
        {
            Ok(mut file) => {
                if let Err(e) = writeln!(file, $($arg)*) {
                    eprintln!("Failed to write to log file: {}", e);
                }
            }
            Err(e) => eprintln!("Failed to open log file: {}", e),
        }
    }};
}

/// Run a block and report its wall time on the progress stream.
#[macro_export]
macro_rules! measure_time {
    ($label:expr, $code:block) => {
        let start = std::time::Instant::now();
        $code
        let duration = start.elapsed().as_secs_f64();
        $crate::print_and_log!("{}: {:.3}", $label, duration);
    };
}
