/// Format tag written into every project snapshot
pub const PROJECT_FORMAT: &str = "train-timetable-plotter-project";

/// Current project snapshot version
pub const PROJECT_VERSION: u32 = 1;

pub const MS_PER_HOUR: f64 = 3_600_000.0;

/// Plot x-axis padding before the earliest point (2 hours)
pub const PLOT_PAD_LEFT_MS: i64 = 2 * 60 * 60 * 1000;

/// Plot x-axis padding after the latest point (30 minutes)
pub const PLOT_PAD_RIGHT_MS: i64 = 30 * 60 * 1000;

/// Default plot x-axis span when there is nothing to plot
pub const PLOT_DEFAULT_SPAN_MS: i64 = 24 * 60 * 60 * 1000;

/// Color value that means "no color assigned"
pub const NO_COLOR: &str = "#000000";

/// Records within this distance (km) are treated as the same stop when
/// looking up the previous time of an edited cell
pub const KM_MATCH_TOLERANCE: f64 = 0.01;

// Timetable re-export layout (1-based rows and columns, as in spreadsheets)
pub const EXPORT_TRAIN_ROW: u32 = 3;
pub const EXPORT_HEADER_ROW: u32 = 11;
pub const EXPORT_FIRST_STATION_ROW: u32 = 12;
pub const EXPORT_KM_COL: u32 = 4;
pub const EXPORT_STATION_COL: u32 = 5;
pub const EXPORT_STOP_TYPE_COL: u32 = 6;
pub const EXPORT_FIRST_TRAIN_COL: u32 = 7;
pub const EXPORT_SHEET_NAME_MAX: usize = 31;
pub const EXPORT_DEFAULT_SHEET_NAME: &str = "Arkusz";
pub const EXPORT_KM_FORMAT: &str = "0.000";
pub const EXPORT_TIME_FORMAT: &str = "h:mm";

// Vehicle circuit layout
pub const CIRCUITS_SHEET_NAME: &str = "Obiegi_pojazdow";
pub const CIRCUITS_HEADER_ROW: u32 = 2;
pub const CIRCUITS_FIRST_COL: u32 = 2;
pub const CIRCUITS_HEADERS: [&str; 9] = [
    "Obieg", "Nr poc.", "Odj. RT", "Rel. od", "Rel. do", "Prz. RT", "Obsluga", "Uwagi", "km",
];
pub const CIRCUITS_UNASSIGNED_LABEL: &str = "Obieg 'pociagi nieprzypisane'";

/// Palette colors with human-readable names used in circuit labels
pub const COLOR_NAMES: [(&str, &str); 6] = [
    ("#e6194b", "czerwony"),
    ("#4363d8", "niebieski"),
    ("#3cb44b", "zielony"),
    ("#f58231", "pomaranczowy"),
    ("#911eb4", "fioletowy"),
    ("#ffe119", "zolty"),
];
