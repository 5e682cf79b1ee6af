//! Native driver for a labeling session.
//!
//! ```text
//! bbox-labeler <folder> [--classes FILE] [--out FILE] [--config FILE]
//! ```
//!
//! Commands are read from stdin, one per line:
//!
//! ```text
//! down X Y | move X Y | up        pointer events in image pixels
//! key NAME                        right, left, delete, backspace, escape, ...
//! wheel DY                        cycle the active class
//! select I | go I | clear         pick a box, jump to an image, clear boxes
//! classes a,b,c                   replace the class list
//! status | boxes | list           print state
//! save-config                     write classes and settings to the config file
//! export                          write the dataset archive
//! quit
//! ```

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::io::BufRead;
    use std::path::PathBuf;
    use std::sync::Arc;

    use bbox_labeler::config::ConfigError;
    use bbox_labeler::export::{ExportError, ExportWorker, ZipArchiver};
    use bbox_labeler::input::{InputEvent, Key};
    use bbox_labeler::model::Point;
    use bbox_labeler::provider::{FileProvider, FolderProvider};
    use bbox_labeler::state::LoadError;
    use bbox_labeler::{AppConfig, Session};

    #[derive(Debug, thiserror::Error)]
    pub enum CliError {
        #[error("{0}")]
        Usage(String),
        #[error(transparent)]
        Config(#[from] ConfigError),
        #[error(transparent)]
        Load(#[from] LoadError),
        #[error(transparent)]
        Export(#[from] ExportError),
        #[error("I/O error: {0}")]
        Io(#[from] std::io::Error),
    }

    const USAGE: &str = "usage: bbox-labeler <folder> [--classes FILE] [--out FILE] [--config FILE]";

    struct Args {
        folder: PathBuf,
        classes: Option<PathBuf>,
        out: Option<PathBuf>,
        config: Option<PathBuf>,
    }

    fn parse_args() -> Result<Args, CliError> {
        let mut folder = None;
        let mut classes = None;
        let mut out = None;
        let mut config = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--classes" => classes = Some(flag_value(&mut args, &arg)?),
                "--out" => out = Some(flag_value(&mut args, &arg)?),
                "--config" => config = Some(flag_value(&mut args, &arg)?),
                "-h" | "--help" => return Err(CliError::Usage(USAGE.to_string())),
                other if folder.is_none() => folder = Some(PathBuf::from(other)),
                other => {
                    return Err(CliError::Usage(format!(
                        "unexpected argument '{}'\n{}",
                        other, USAGE
                    )));
                }
            }
        }

        Ok(Args {
            folder: folder.ok_or_else(|| CliError::Usage(USAGE.to_string()))?,
            classes,
            out,
            config,
        })
    }

    fn flag_value(
        args: &mut impl Iterator<Item = String>,
        flag: &str,
    ) -> Result<PathBuf, CliError> {
        args.next()
            .map(PathBuf::from)
            .ok_or_else(|| CliError::Usage(format!("{} needs a value\n{}", flag, USAGE)))
    }

    pub fn run() -> Result<(), CliError> {
        let args = parse_args()?;

        let config = match &args.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::load_from_default_path().unwrap_or_default(),
        };

        env_logger::Builder::from_env(
            env_logger::Env::default()
                .default_filter_or(config.preferences.log_level.to_level_filter().as_str()),
        )
        .init();

        let mut session = Session::new(config.session_settings(), config.keybindings.clone());
        session.set_classes(&config.classes);
        if let Some(path) = &args.classes {
            session.set_classes_text(&std::fs::read_to_string(path)?);
        }

        session.load_images(FolderProvider::new(&args.folder).files()?)?;
        print_status(&session);

        let out = args
            .out
            .unwrap_or_else(|| PathBuf::from(bbox_labeler::constants::export::ARCHIVE_NAME));
        let mut pending: Option<ExportWorker> = None;

        for line in std::io::stdin().lock().lines() {
            let line = line?;
            let words: Vec<&str> = line.split_whitespace().collect();
            let Some((&command, rest)) = words.split_first() else {
                continue;
            };

            if let Some(worker) = pending.as_mut() {
                if let Some(result) = worker.poll() {
                    pending = None;
                    finish_export(result, &out);
                }
            }

            match (command, rest) {
                ("down", [x, y]) | ("move", [x, y]) => {
                    let Some(point) = parse_point(x, y) else {
                        println!("bad coordinates");
                        continue;
                    };
                    let event = if command == "down" {
                        InputEvent::PointerDown(point)
                    } else {
                        InputEvent::PointerMove(point)
                    };
                    session.handle(event);
                    if command == "down" {
                        if let Some(index) = session.selection() {
                            println!("selected {}", index);
                        }
                    }
                }
                ("up", []) => match session.pointer_up() {
                    Some(index) => println!("added box {}", index),
                    None => println!("no box added"),
                },
                ("key", [name]) => match Key::from_name(name) {
                    Some(key) => {
                        if session.handle(InputEvent::Key(key)) {
                            print_status(&session);
                        }
                    }
                    None => println!("unknown key '{}'", name),
                },
                ("wheel", [dy]) => match dy.parse::<f32>() {
                    Ok(delta_y) => {
                        session.handle(InputEvent::Wheel { delta_y });
                        let active = session.active_class();
                        println!("active class {} ({})", active, session.classes().name_of(active));
                    }
                    Err(_) => println!("bad wheel delta"),
                },
                ("select", [index]) => match index.parse::<usize>() {
                    Ok(index) if session.select(index) => println!("selected {}", index),
                    _ => println!("no such box"),
                },
                ("go", [index]) => match index.parse::<usize>() {
                    Ok(index) => {
                        session.go_to(index);
                        print_status(&session);
                    }
                    Err(_) => println!("bad image index"),
                },
                ("clear", []) => println!("removed {} boxes", session.clear_current()),
                ("classes", [list]) => {
                    session.set_classes(list.split(','));
                    println!("{} classes", session.classes().len());
                }
                ("status", []) => print_status(&session),
                ("save-config", []) => {
                    let Some(path) = args.config.clone().or_else(AppConfig::default_path) else {
                        println!("no config path available");
                        continue;
                    };
                    let mut saved = config.clone();
                    saved.capture_session(&session);
                    match saved.save(&path) {
                        Ok(()) => println!("saved {}", path.display()),
                        Err(e) => println!("failed to save config: {}", e),
                    }
                }
                ("boxes", []) => {
                    for (index, row) in session.annotation_rows().iter().enumerate() {
                        let marker = if row.is_selected { '*' } else { ' ' };
                        println!(
                            "{}{} {} {}",
                            marker,
                            index,
                            row.label,
                            row.normalized.as_deref().unwrap_or("-")
                        );
                    }
                }
                ("list", []) => {
                    for entry in session.image_list() {
                        let marker = if entry.is_current { '>' } else { ' ' };
                        let done = if entry.is_annotated { "+" } else { "" };
                        println!("{}{}{}", marker, entry.name, done);
                    }
                }
                ("export", []) => {
                    if pending.is_some() {
                        println!("export already running");
                        continue;
                    }
                    match session.spawn_export(Arc::new(ZipArchiver)) {
                        Ok(worker) => pending = Some(worker),
                        Err(e) => println!("{}", e),
                    }
                }
                ("quit", []) => break,
                _ => println!("unknown command '{}'", line.trim()),
            }
        }

        if let Some(worker) = pending {
            finish_export(worker.wait(), &out);
        }
        Ok(())
    }

    fn parse_point(x: &str, y: &str) -> Option<Point> {
        Some(Point::new(x.parse().ok()?, y.parse().ok()?))
    }

    fn print_status(session: &Session) {
        match session.status() {
            Some(status) => println!(
                "{} [{}] {}",
                status.image_name,
                status.progress,
                status.dimensions.as_deref().unwrap_or("?x?")
            ),
            None => println!("no image"),
        }
    }

    fn finish_export(
        result: Result<bbox_labeler::export::ExportArtifact, ExportError>,
        out: &std::path::Path,
    ) {
        let artifact = match result {
            Ok(artifact) => artifact,
            Err(e) => {
                println!("export failed: {}", e);
                return;
            }
        };
        for warning in &artifact.report.warnings {
            println!("warning: {}: {}", warning.image, warning.message);
        }
        match std::fs::write(out, &artifact.bytes) {
            Ok(()) => println!(
                "wrote {} ({} images, {} boxes)",
                out.display(),
                artifact.report.images_exported,
                artifact.report.annotations_exported
            ),
            Err(e) => println!("failed to write {}: {}", out.display(), e),
        }
    }
}
