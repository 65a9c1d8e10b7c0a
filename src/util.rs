use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::str::FromStr;
use std::thread;

use argparse::{ArgumentParser, Print, Store, StoreOption, StoreTrue};
use log::LevelFilter;
use tokio::fs::OpenOptions;
use tokio::io::{stdout, AsyncWrite};

use crate::chunk::Separator;
use crate::error::{Error, Result};
use crate::pipeline::{Collect, Options};

pub struct Config {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub options: Options,
    pub verify: bool,
    pub log: String,
    pub log_level: LevelFilter,
}

fn default_threads() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

/// Parses `args` (program name first). `Err` carries the exit code, with
/// help, version or usage errors already printed.
pub fn parse_args_from(
    description: &str,
    args: Vec<String>,
    out: &mut dyn io::Write,
    err: &mut dyn io::Write,
) -> std::result::Result<Config, i32> {
    let mut input = String::new();
    let mut output: Option<String> = None;
    let mut threads = default_threads();
    let mut whitespace = false;
    let mut channel = false;
    let mut verify = false;
    let mut log = "-".to_owned();
    let mut log_level = "info".to_owned();

    {
        // this block limits scope of borrows by ap.refer() method
        let mut ap = ArgumentParser::new();

        ap.set_description(description);
        ap.add_option(
            &["-V", "--version"],
            Print(env!("CARGO_PKG_VERSION").to_string()),
            "Show version",
        );

        ap.refer(&mut input)
            .add_argument("input", Store, "input file")
            .required();

        ap.refer(&mut output).add_argument(
            "output",
            StoreOption,
            "output file - default: stdout",
        );

        ap.refer(&mut threads).add_option(
            &["-t", "--threads"],
            Store,
            "chunk count, one worker per chunk - default: available cores",
        );

        ap.refer(&mut whitespace).add_option(
            &["-w", "--whitespace"],
            StoreTrue,
            "split words on any ASCII whitespace, not just spaces",
        );

        ap.refer(&mut channel).add_option(
            &["--channel"],
            StoreTrue,
            "collect chunk results over a channel instead of result slots",
        );

        ap.refer(&mut verify).add_option(
            &["--verify"],
            StoreTrue,
            "check the result against a single linear pass",
        );

        ap.refer(&mut log)
            .add_option(&["--log"], Store, "log file - default: stderr (-)");

        ap.refer(&mut log_level).add_option(
            &["--log-level"],
            Store,
            "off, error, warn, info, debug or trace - default: info",
        );

        ap.parse(args, out, err)?;
    }

    if threads == 0 {
        let _ = writeln!(err, "thread count must be at least 1");
        return Err(2);
    }
    let log_level = match LevelFilter::from_str(&log_level) {
        Ok(level) => level,
        Err(_) => {
            let _ = writeln!(err, "unknown log level \"{}\"", log_level);
            return Err(2);
        }
    };

    Ok(Config {
        input: PathBuf::from(input),
        output: output.map(PathBuf::from),
        options: Options {
            chunk_count: threads,
            separator: if whitespace {
                Separator::Whitespace
            } else {
                Separator::Space
            },
            collect: if channel {
                Collect::Channel
            } else {
                Collect::Slots
            },
        },
        verify,
        log,
        log_level,
    })
}

pub fn parse_args(description: &str) -> Config {
    let args = std::env::args().collect();
    match parse_args_from(description, args, &mut io::stdout(), &mut io::stderr()) {
        Ok(conf) => conf,
        Err(code) => std::process::exit(code),
    }
}

pub async fn open_output(path: Option<&Path>) -> Result<Pin<Box<dyn AsyncWrite + Send>>> {
    let output: Pin<Box<dyn AsyncWrite + Send>> = match path {
        None => Box::pin(stdout()),
        Some(filename) => {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(filename)
                .await
                .map_err(|e| Error::file_open(filename, e))?;
            Box::pin(file)
        }
    };
    Ok(output)
}

use libc::{getrusage, rusage, RUSAGE_SELF};

/// User and system CPU time of this process in microseconds.
pub fn get_cputime_usecs() -> (u64, u64) {
    // all-zero is a valid rusage
    let mut usage: rusage = unsafe { std::mem::zeroed() };

    unsafe {
        getrusage(RUSAGE_SELF, &mut usage);
    }

    let u_secs = usage.ru_utime.tv_sec as u64;
    let u_usecs = usage.ru_utime.tv_usec as u64;
    let s_secs = usage.ru_stime.tv_sec as u64;
    let s_usecs = usage.ru_stime.tv_usec as u64;

    let u_time = (u_secs * 1_000_000) + u_usecs;
    let s_time = (s_secs * 1_000_000) + s_usecs;

    (u_time, s_time)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<Config, i32> {
        let args = std::iter::once("wc-chunked")
            .chain(args.iter().copied())
            .map(String::from)
            .collect();
        parse_args_from("test", args, &mut io::sink(), &mut io::sink())
    }

    #[test]
    fn input_only() {
        let conf = parse(&["words.txt"]).unwrap();
        assert_eq!(conf.input, PathBuf::from("words.txt"));
        assert!(conf.output.is_none());
        assert!(conf.options.chunk_count >= 1);
        assert_eq!(conf.options.separator, Separator::Space);
        assert_eq!(conf.options.collect, Collect::Slots);
        assert_eq!(conf.log, "-");
        assert_eq!(conf.log_level, LevelFilter::Info);
    }

    #[test]
    fn all_options() {
        let conf = parse(&[
            "-t", "20", "-w", "--channel", "--verify", "--log-level", "debug", "in.txt", "out.txt",
        ])
        .unwrap();
        assert_eq!(conf.options.chunk_count, 20);
        assert_eq!(conf.options.separator, Separator::Whitespace);
        assert_eq!(conf.options.collect, Collect::Channel);
        assert!(conf.verify);
        assert_eq!(conf.output, Some(PathBuf::from("out.txt")));
        assert_eq!(conf.log_level, LevelFilter::Debug);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(parse(&[]).is_err());
        assert_eq!(parse(&["-t", "0", "in.txt"]).err(), Some(2));
        assert_eq!(parse(&["--log-level", "loud", "in.txt"]).err(), Some(2));
    }

    #[test]
    fn cputime_is_monotonic() {
        let (usr_a, sys_a) = get_cputime_usecs();
        let mut acc = 0u64;
        for i in 0..100_000u64 {
            acc = acc.wrapping_add(i * i);
        }
        let (usr_b, sys_b) = get_cputime_usecs();
        assert!(acc > 0);
        assert!(usr_b >= usr_a);
        assert!(sys_b >= sys_a);
    }
}
