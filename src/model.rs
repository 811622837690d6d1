use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameworkKind {
    Laravel,
    Symfony,
    Codeigniter,
    Unknown,
}

impl FrameworkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameworkKind::Laravel => "laravel",
            FrameworkKind::Symfony => "symfony",
            FrameworkKind::Codeigniter => "codeigniter",
            FrameworkKind::Unknown => "unknown",
        }
    }

    /// Front controller the built-in web server should route through.
    pub(crate) fn serve_entry(&self) -> &'static str {
        match self {
            FrameworkKind::Laravel | FrameworkKind::Symfony | FrameworkKind::Codeigniter => {
                "public/index.php"
            }
            FrameworkKind::Unknown => "index.php",
        }
    }
}

impl fmt::Display for FrameworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cache locations of the extracted interpreter and package manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub interpreter: PathBuf,
    pub composer: PathBuf,
}

/// A fully resolved child process launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub working_dir: PathBuf,
}

impl Invocation {
    pub(crate) fn display_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }
}
