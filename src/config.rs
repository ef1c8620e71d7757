// system configuration and command line processing

use ::clap::{arg, Command};
use crate::messages::DebugLevel;
use crate::runtime::{DEFAULT_PROMPT, DEFAULT_QUITPROMPT, PROMPT_MAX};

pub const VERSION: &str = "0.1.0";

pub struct Config {
    pub debug_level: DebugLevel,
    pub loaded_file: String,
    pub prompt: String,
    pub quit_prompt: String,
    pub no_init: bool,
    pub run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Config {
        Config {
            debug_level: DebugLevel::Error,
            loaded_file: "".to_owned(),
            prompt: DEFAULT_PROMPT.to_owned(),
            quit_prompt: DEFAULT_QUITPROMPT.to_owned(),
            no_init: false,
            run: true,
        }
    }

    /// process_args handles command line argument processing using the clap library
    pub fn process_args(&mut self) -> &Config {
        let arguments = Command::new("tomoko")
            .version(VERSION)
            .about("A threaded Forth interpreter")
            .arg(
                arg!(--debuglevel <VALUE>)
                    .required(false)
                    .value_parser(["error", "warning", "info", "debug"]),
            )
            .arg(arg!(-f --file <VALUE>).required(false))
            .arg(arg!(--prompt <VALUE>).required(false))
            .arg(arg!(-n - -"no-init").required(false))
            .get_matches();

        if let Some(level) = arguments.get_one::<String>("debuglevel") {
            self.debug_level = match level.as_str() {
                "debug" => DebugLevel::Debug,
                "info" => DebugLevel::Info,
                "warning" => DebugLevel::Warning,
                _ => DebugLevel::Error,
            };
        }

        if let Some(file) = arguments.get_one::<String>("file") {
            self.loaded_file = file.clone();
        }

        if let Some(prompt) = arguments.get_one::<String>("prompt") {
            let mut p = prompt.clone();
            p.truncate(PROMPT_MAX);
            self.prompt = p;
        }

        if arguments.get_flag("no-init") {
            self.no_init = true;
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_interpreter() {
        let config = Config::new();
        assert_eq!(config.prompt, "> ");
        assert_eq!(config.quit_prompt, "ok ");
        assert!(!config.no_init);
    }
}
