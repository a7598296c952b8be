use clap::ValueEnum;

#[derive(Debug, Clone)]
pub struct EmployeeRecord {
    pub worker_id: String,
    pub position_name: String,
    pub kpi_final_score: Option<f64>,
    pub behavior_assessment_score: Option<f64>,
    pub individual_performance_score: Option<f64>,
}

/// One score column of the assessment file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum Metric {
    KpiFinal,
    BehaviorAssessment,
    IndividualPerformance,
}

impl Metric {
    pub const ALL: [Metric; 3] = [
        Metric::KpiFinal,
        Metric::BehaviorAssessment,
        Metric::IndividualPerformance,
    ];

    /// Column header in the source CSV.
    pub fn column(self) -> &'static str {
        match self {
            Metric::KpiFinal => "Skor_KPI_Final",
            Metric::BehaviorAssessment => "Skor_Assessment",
            Metric::IndividualPerformance => "Skor_Kinerja_Individu",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::KpiFinal => "Final KPI score",
            Metric::BehaviorAssessment => "AKHLAK behavior assessment score",
            Metric::IndividualPerformance => "Individual performance score",
        }
    }

    pub fn value(self, record: &EmployeeRecord) -> Option<f64> {
        match self {
            Metric::KpiFinal => record.kpi_final_score,
            Metric::BehaviorAssessment => record.behavior_assessment_score,
            Metric::IndividualPerformance => record.individual_performance_score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSummary {
    pub minimum: f64,
    pub maximum: f64,
    pub mean: f64,
}

/// Performance bands over the individual performance score. The boundaries
/// encode HR policy and must stay exactly as written: 105 is BAIK, 110 is
/// SANGAT BAIK.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceCategory {
    Istimewa,
    SangatBaik,
    Baik,
    Cukup,
    Kurang,
    Unclassified,
}

impl PerformanceCategory {
    pub fn label(self) -> &'static str {
        match self {
            PerformanceCategory::Istimewa => "ISTIMEWA",
            PerformanceCategory::SangatBaik => "SANGAT BAIK",
            PerformanceCategory::Baik => "BAIK",
            PerformanceCategory::Cukup => "CUKUP",
            PerformanceCategory::Kurang => "KURANG",
            PerformanceCategory::Unclassified => "UNCLASSIFIED",
        }
    }
}

impl std::fmt::Display for PerformanceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryBreakdown {
    pub istimewa: usize,
    pub sangat_baik: usize,
    pub baik: usize,
    pub cukup: usize,
    pub kurang: usize,
    pub unclassified: usize,
}

impl CategoryBreakdown {
    pub fn counts(&self) -> [(PerformanceCategory, usize); 6] {
        [
            (PerformanceCategory::Istimewa, self.istimewa),
            (PerformanceCategory::SangatBaik, self.sangat_baik),
            (PerformanceCategory::Baik, self.baik),
            (PerformanceCategory::Cukup, self.cukup),
            (PerformanceCategory::Kurang, self.kurang),
            (PerformanceCategory::Unclassified, self.unclassified),
        ]
    }
}
