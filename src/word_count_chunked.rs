// Counts space separated words of one file in parallel byte-range chunks and
// prints "<count> <word>" lines, most frequent first.

use std::process::exit;
use std::sync::Arc;
use std::time::Instant;

use log::info;
use tokio::runtime::Builder;

use word_count::logging::set_logger_or_exit;
use word_count::util::*;
use word_count::{count_words, render, verify, Error, InputFile, Result};

fn run(conf: &Config) -> Result<()> {
    let runtime = Builder::new_multi_thread().enable_all().build()?;

    runtime.block_on(async {
        let source = Arc::new(InputFile::from_path(&conf.input)?);
        info!("counting words of {}", source.path().display());

        let ranked = count_words(Arc::clone(&source), &conf.options).await?;
        if conf.verify {
            verify(source, conf.options.separator, &ranked).await?;
            info!("linear verification passed");
        }

        // only touch the output once there is a complete result
        let output = open_output(conf.output.as_deref()).await?;
        render(ranked, output).await?;
        Ok::<_, Error>(())
    })
}

fn main() {
    let conf = parse_args("word count chunked");
    set_logger_or_exit(&conf.log, conf.log_level);

    let (start_usr_time, start_sys_time) = get_cputime_usecs();
    let start_time = Instant::now();

    if let Err(e) = run(&conf) {
        eprintln!("error: {}", e);
        exit(1);
    }

    let difference = start_time.elapsed();
    let (end_usr_time, end_sys_time) = get_cputime_usecs();
    let usr_time = (end_usr_time - start_usr_time) as f64 / 1_000_000.0;
    let sys_time = (end_sys_time - start_sys_time) as f64 / 1_000_000.0;
    info!(
        "walltime: {:?} (usr: {:.3}s sys: {:.3}s)",
        difference, usr_time, sys_time
    );
}
