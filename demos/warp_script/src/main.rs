use argh::FromArgs;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use meshwarp::session::{Command, Frame, MeshRenderer, Session, SessionConfig};

#[derive(FromArgs)]
/// Replay a script of warp commands and dump the resulting mesh as JSON
struct Args {
    /// path to the JSON script
    #[argh(option, short = 's')]
    script: PathBuf,

    /// path to the output JSON file, stdout if missing
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,

    /// keep going when a command is rejected
    #[argh(switch, short = 'k')]
    keep_going: bool,
}

#[derive(serde::Deserialize)]
struct Script {
    #[serde(default)]
    config: SessionConfig,
    commands: Vec<Command>,
}

/// Writes every frame it is given as one JSON document.
struct JsonRenderer<W: Write> {
    writer: W,
}

impl<W: Write> MeshRenderer for JsonRenderer<W> {
    type Error = serde_json::Error;

    fn draw(&mut self, frame: &Frame<'_>) -> Result<(), Self::Error> {
        serde_json::to_writer(&mut self.writer, frame)?;
        self.writer.write_all(b"\n").map_err(serde_json::Error::io)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    // read the script
    let script: Script = serde_json::from_reader(File::open(&args.script)?)?;
    let mut session = Session::new(script.config)?;

    // replay the commands in order
    for (i, command) in script.commands.into_iter().enumerate() {
        if let Err(e) = session.dispatch(command) {
            if !args.keep_going {
                return Err(format!("command {i} failed: {e}").into());
            }
            log::warn!("skipping command {i}: {e}");
        }
    }

    log::info!("transform: {}", session.params());
    for label in session.anchor_labels() {
        log::info!("{label}");
    }

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout().lock()),
    };
    let mut renderer = JsonRenderer { writer };

    if !session.render(&mut renderer)? {
        log::warn!("no image was loaded, nothing to render");
    }
    renderer.writer.flush()?;

    Ok(())
}
