// tomoko: a threaded Forth interpreter

mod config;
mod dictionary;
mod input;
mod interpreter;
mod kernel;
mod messages;
mod primitives;
mod runtime;

use config::Config;
use runtime::ForthRuntime;

fn main() {
    let mut config = Config::new();
    config.process_args();

    let mut rt = ForthRuntime::new();
    rt.msg.set_level(config.debug_level);
    rt.prompt = config.prompt.clone();
    rt.quit_prompt = config.quit_prompt.clone();
    rt.skip_init_file = config.no_init;

    rt.cold_start();

    if !config.loaded_file.is_empty() {
        match std::fs::read_to_string(&config.loaded_file) {
            Ok(text) => {
                for line in text.lines() {
                    rt.interpret_line(line);
                }
            }
            Err(e) => rt.msg.error("MAIN", "unable to read file", Some(e)),
        }
    }

    rt.load_init_file();
    rt.quit();
}
