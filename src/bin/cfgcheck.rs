/*
    MIT License

    Copyright (c) 2020 Lars Krueger <lars_e_krueger@gmx.de>

    Permission is hereby granted, free of charge, to any person obtaining a copy
    of this software and associated documentation files (the "Software"), to deal
    in the Software without restriction, including without limitation the rights
    to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
    copies of the Software, and to permit persons to whom the Software is
    furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in all
    copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
    OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
    SOFTWARE.
*/

#[macro_use]
extern crate log;
extern crate flexi_logger;

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::exit;
use std::str::FromStr;

use structopt::StructOpt;

use cfg_recognizer::{EarleyRecognizer, Grammar, GrammarError, Lr1Recognizer};

#[derive(Debug)]
enum Engine {
    Earley,
    Lr1,
}

impl FromStr for Engine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "earley" => Ok(Engine::Earley),
            "lr1" => Ok(Engine::Lr1),
            other => Err(format!("unknown engine `{}`, expected `earley` or `lr1`", other)),
        }
    }
}

#[derive(Debug, StructOpt)]
#[structopt(name = "cfgcheck", about = "Check whether words belong to a context-free grammar")]
struct CommandLine {
    /// Grammar file, in the back-tick delimited four-line format
    #[structopt(parse(from_os_str))]
    grammar: PathBuf,

    /// Recognizer to use
    #[structopt(long, default_value = "earley")]
    engine: Engine,

    /// Words to check; pass `-` to read one word per line from stdin instead
    words: Vec<String>,
}

fn words_from_stdin() -> Vec<String> {
    io::stdin()
        .lock()
        .lines()
        .map(|line| line.expect("failed to read a line from stdin"))
        .collect()
}

fn main() {
    let _ = std::env::var("CFGCHECK_LOG").and_then(|log| {
        let _ = flexi_logger::Logger::with_str(log)
            .format(flexi_logger::with_thread)
            .log_to_file()
            .start();
        info!("logging is ready");
        Ok(())
    });

    let cmd_line = CommandLine::from_args();
    debug!("{:?}", cmd_line);

    let words = if cmd_line.words.len() == 1 && cmd_line.words[0] == "-" {
        words_from_stdin()
    } else {
        cmd_line.words
    };

    match run(&cmd_line.grammar, &cmd_line.engine, &words) {
        Ok(()) => exit(0),
        Err(GrammarError::IncorrectGrammarInput { message, line, column, pointer }) => {
            eprintln!("incorrect grammar input at line {}, column {}: {}\n{}", line, column, message, pointer);
            exit(11);
        }
        Err(GrammarError::GrammarNotLR1(conflict)) => {
            eprintln!("grammar is not LR(1): {}", conflict);
            exit(2);
        }
        Err(GrammarError::NotImplemented(k)) => {
            eprintln!("LR({}) is not implemented, only LR(1)", k);
            exit(12);
        }
        Err(GrammarError::PreconditionViolated) => {
            eprintln!("parse called before a grammar was loaded");
            exit(12);
        }
    }
}

fn run(grammar_path: &std::path::Path, engine: &Engine, words: &[String]) -> Result<(), GrammarError> {
    let grammar = Grammar::load_path(grammar_path)?;
    info!("grammar loaded from {}", grammar_path.display());

    match engine {
        Engine::Lr1 => {
            let recognizer = Lr1Recognizer::build(&grammar)?;
            for word in words {
                println!("{}", recognizer.parse(word));
            }
        }
        Engine::Earley => {
            let recognizer = EarleyRecognizer::new(grammar);
            for word in words {
                println!("{}", recognizer.parse(word));
            }
        }
    }
    Ok(())
}
