use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use brickfall_engine::GameView;

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn from_output_path(output_path: Option<&Path>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path.to_owned()),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self)
            .with_context(|| format!("Failed to write to {}", self.display_path()))?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }

    /// Writes the playfield followed by the status line.
    pub fn write_view(&mut self, view: &GameView) -> anyhow::Result<()> {
        write!(self, "{view}")
            .and_then(|()| writeln!(self, "{}", status_line(view)))
            .and_then(|()| self.flush())
            .with_context(|| format!("Failed to write view to {}", self.display_path()))
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

pub fn status_line(view: &GameView) -> String {
    format!(
        "status: {:?}  score: {}  lines: {}  level: {}{}",
        view.status(),
        view.score(),
        view.lines(),
        view.level(),
        if view.is_muted() { "  (muted)" } else { "" }
    )
}

/// Writes `view` to `output_path` (stdout when `None`) as JSON or as text.
pub fn save_view(view: &GameView, output_path: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let mut output = Output::from_output_path(output_path)?;
    if json {
        output.write_json(view)
    } else {
        output.write_view(view)
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}
