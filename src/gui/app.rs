use super::plots;
use crate::core::FastqFile;
use crate::model::{PlotKind, PlotSeries, SampleSize};
use crate::shell::{FileSummary, Intent, IntentKind, Outcome, Shell, ShellError};
use eframe::egui::{self, Color32, RichText};

enum Notice {
    Info(String),
    Error(String),
}

/// Top-level application state: the session shell plus presentation
/// scratch (current plot, statistics text, status notice, selector
/// choices).
pub struct AnalyzerApp {
    shell: Shell<FastqFile>,
    plot_kind: PlotKind,
    sample_size: SampleSize,
    current_plot: Option<PlotSeries>,
    stats_text: Option<String>,
    notice: Option<Notice>,
}

impl AnalyzerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            shell: Shell::new(),
            plot_kind: PlotKind::PerBaseQuality,
            sample_size: SampleSize::Limit(5000),
            current_plot: None,
            stats_text: None,
            notice: None,
        }
    }

    /// Runs one intent through the shell and folds the outcome into the
    /// presentation state. All user-facing reporting happens here.
    fn apply(&mut self, intent: Intent) {
        match self.shell.dispatch(intent) {
            Ok(Outcome::Selected { path }) => {
                self.current_plot = None;
                self.stats_text = None;
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                self.notice = Some(Notice::Info(format!("Ready to load: {name}")));
            }
            Ok(Outcome::Loaded(summary)) => {
                self.current_plot = None;
                self.notice = Some(Notice::Info(format!(
                    "Loaded {} sequences",
                    thousands(summary.sequence_count)
                )));
                self.apply(Intent::Stats);
            }
            Ok(Outcome::Stats(summary)) => {
                let name = self.shell.selected_name().unwrap_or_default();
                self.stats_text = Some(format_summary(&summary, &name));
            }
            Ok(Outcome::Plot(series)) => {
                self.notice = Some(Notice::Info(format!(
                    "{} ready",
                    series.kind().label()
                )));
                self.current_plot = Some(series);
            }
            Err(err) => {
                // A failed load resets the shell; drop the stale
                // presentation alongside it.
                if matches!(err, ShellError::Load(_)) {
                    self.current_plot = None;
                    self.stats_text = None;
                }
                self.notice = Some(Notice::Error(err.to_string()));
            }
        }
    }

    fn browse(&mut self) {
        let dialog = rfd::FileDialog::new()
            .add_filter("FASTQ files", &["fastq", "fq"])
            .add_filter("Compressed FASTQ", &["fastq.gz", "fq.gz", "gz"])
            .add_filter("All files", &["*"]);
        if let Some(path) = dialog.pick_file() {
            self.apply(Intent::Select(path));
        }
    }

    fn file_section(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                if ui.button("Browse...").clicked() {
                    self.browse();
                }
                let load_enabled = self.shell.is_enabled(IntentKind::Load);
                if ui
                    .add_enabled(load_enabled, egui::Button::new("Load File"))
                    .clicked()
                {
                    self.apply(Intent::Load);
                }
                ui.separator();
                match self.shell.selected_name() {
                    Some(name) => {
                        ui.colored_label(Color32::DARK_GREEN, name);
                    }
                    None => {
                        ui.colored_label(Color32::GRAY, "No file selected");
                    }
                }
            });
        });
    }

    fn analysis_section(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.label("Plot Type:");
                egui::ComboBox::from_id_salt("plot_kind")
                    .selected_text(self.plot_kind.label())
                    .show_ui(ui, |ui| {
                        for kind in PlotKind::ALL {
                            ui.selectable_value(&mut self.plot_kind, kind, kind.label());
                        }
                    });
                ui.label("Sample Size:");
                egui::ComboBox::from_id_salt("sample_size")
                    .selected_text(self.sample_size.label())
                    .show_ui(ui, |ui| {
                        for sample in SampleSize::CHOICES {
                            ui.selectable_value(&mut self.sample_size, sample, sample.label());
                        }
                    });
                let plot_enabled = self.shell.is_enabled(IntentKind::Plot);
                if ui
                    .add_enabled(plot_enabled, egui::Button::new("Generate Plot"))
                    .clicked()
                {
                    self.apply(Intent::Plot {
                        kind: self.plot_kind,
                        sample: self.sample_size,
                    });
                }
            });
            if let Some(stats) = &self.stats_text {
                ui.add_space(4.0);
                ui.label(stats);
            }
        });
    }

    fn plot_section(&mut self, ui: &mut egui::Ui) {
        match &self.current_plot {
            Some(series) => plots::show(ui, series),
            None => {
                ui.centered_and_justified(|ui| {
                    ui.colored_label(
                        Color32::GRAY,
                        "Load a FASTQ file and generate a plot to see it here",
                    );
                });
            }
        }
    }
}

impl eframe::App for AnalyzerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.vertical_centered(|ui| {
                ui.heading(RichText::new(super::APP_TITLE).size(22.0).strong());
            });
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| match &self.notice {
                Some(Notice::Error(text)) => {
                    ui.colored_label(Color32::LIGHT_RED, format!("Error: {text}"));
                }
                Some(Notice::Info(text)) => {
                    ui.label(text);
                }
                None => {
                    ui.label("Ready");
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.file_section(ui);
            ui.add_space(8.0);
            self.analysis_section(ui);
            ui.add_space(8.0);
            self.plot_section(ui);
        });
    }
}

/// Groups digits with thousands separators ("25000" -> "25,000").
fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn format_summary(summary: &FileSummary, file_name: &str) -> String {
    format!(
        "Total Sequences: {}\nAverage Length: {:.2} bp\nTotal Base Pairs: {}\nFile: {}",
        thousands(summary.sequence_count),
        summary.average_length,
        thousands(summary.total_base_pairs),
        file_name,
    )
}
