use anyhow::Context;
use argh::FromArgs;
use sint::Interpreter;
use sint::Tree;
use sint::command::ExitCode;
use sint::io_adapters::{EditorSource, LineSource};
use sint::line_reader::LineReader;

#[derive(FromArgs)]
/// Sorted container interpreter. Reads commands from standard input:
/// `i <key> <label>`, `e <key> <label>`, `c <key> <label>`, `p`, `t`, `x`.
struct Options {
    #[argh(switch, short = 'q')]
    /// do not print the prompt and the closing message.
    quiet: bool,

    #[argh(switch, short = 'i')]
    /// read commands through a line editor with history.
    interactive: bool,

    #[argh(option)]
    /// refuse to store more than this many records.
    max_records: Option<usize>,
}

fn run(options: Options) -> anyhow::Result<()> {
    let tree = match options.max_records {
        Some(limit) => Tree::with_node_limit(limit),
        None => Tree::new(),
    };
    let mut sint = Interpreter::with_tree(tree);
    sint.set_farewell(!options.quiet);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let mut source: Box<dyn LineSource> = if options.interactive {
        let prompt = if options.quiet { "" } else { "> " };
        Box::new(EditorSource::new(prompt).context("cannot start line editor")?)
    } else {
        sint.set_prompt(!options.quiet);
        Box::new(LineReader::new(std::io::stdin().lock()))
    };

    sint.run(source.as_mut(), &mut out)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let options: Options = argh::from_env();
    let code: ExitCode = match run(options) {
        Ok(()) => 0,
        Err(err) => {
            log::error!("{err:#}");
            1
        }
    };
    std::process::exit(code);
}
