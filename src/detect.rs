use std::fs;
use std::path::Path;

use tracing::debug;

use crate::model::FrameworkKind;

#[derive(Debug, Clone, Copy)]
enum Probe {
    File(&'static str),
    Dir(&'static str),
}

impl Probe {
    /// Any I/O error (missing entry, permission denied) counts as a miss.
    fn holds(&self, root: &Path) -> bool {
        match *self {
            Probe::File(rel) => fs::metadata(root.join(rel)).is_ok_and(|meta| meta.is_file()),
            Probe::Dir(rel) => fs::metadata(root.join(rel)).is_ok_and(|meta| meta.is_dir()),
        }
    }
}

// Evaluated top to bottom. `artisan` must be checked before the CodeIgniter
// layout because both share `public/index.php`.
const RULES: &[(FrameworkKind, &[Probe])] = &[
    (
        FrameworkKind::Laravel,
        &[Probe::File("artisan"), Probe::File("public/index.php")],
    ),
    (
        FrameworkKind::Symfony,
        &[Probe::File("bin/console"), Probe::File("config/bootstrap.php")],
    ),
    (
        FrameworkKind::Codeigniter,
        &[Probe::File("public/index.php"), Probe::Dir("app/Config")],
    ),
];

pub(crate) fn detect_framework(root: &Path) -> FrameworkKind {
    let kind = RULES
        .iter()
        .find(|(_, probes)| probes.iter().all(|probe| probe.holds(root)))
        .map(|(kind, _)| *kind)
        .unwrap_or(FrameworkKind::Unknown);
    debug!(framework = %kind, "detected framework in {}", root.display());
    kind
}
