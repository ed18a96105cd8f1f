//! Cohort statistics over extracted case records.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::export::CaseRow;
use crate::models::{Outcome, Treatment, Trigger, Vocabulary};

/// Mean MetHb above which a trigger is reported as high risk.
pub const HIGH_RISK_MEAN_METHB: f64 = 30.0;

/// Age bands used for the age-group breakdown, upper bound inclusive.
const AGE_GROUPS: [(&str, u32, u32); 4] = [("<18", 0, 18), ("18-40", 18, 40), ("40-60", 40, 60), ("60+", 60, 100)];

/// Summary of a numeric sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub n: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation; `None` below two values
    pub std_dev: Option<f64>,
}

impl Distribution {
    /// Describe `values`, or `None` when there are none.
    pub fn describe(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };
        let std_dev = (n > 1).then(|| {
            let var = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            var.sqrt()
        });

        Some(Self {
            n,
            mean,
            median,
            min: sorted[0],
            max: sorted[n - 1],
            std_dev,
        })
    }
}

/// MetHb profile of one trigger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggerProfile {
    pub trigger: Trigger,
    pub methb: Distribution,
    pub high_risk: bool,
}

/// Cases, MetHb and recovery within one age band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeGroup {
    pub label: &'static str,
    pub cases: usize,
    pub mean_methb: Option<f64>,
    /// Percentage of cases with outcome Recovered
    pub recovery_rate: f64,
}

/// Outcomes of cases treated with methylene blue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethyleneBlueOutcomes {
    pub cases: usize,
    pub recovered: usize,
    pub recovery_rate: f64,
    pub mean_methb: Option<f64>,
    /// Dose expressions and how often each appears
    pub doses: Vec<(String, usize)>,
    /// Time-to-improvement expressions and how often each appears
    pub response_times: Vec<(String, usize)>,
}

/// Descriptive statistics for a set of records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortStats {
    pub records: usize,
    pub methb: Option<Distribution>,
    pub age: Option<Distribution>,
    pub genders: Vec<(String, usize)>,
    /// Known triggers only
    pub triggers: Vec<(String, usize)>,
    pub treatments: Vec<(String, usize)>,
    pub outcomes: Vec<(String, usize)>,
    /// Sorted by mean MetHb, highest first
    pub trigger_profiles: Vec<TriggerProfile>,
    pub age_groups: Vec<AgeGroup>,
    pub methylene_blue: Option<MethyleneBlueOutcomes>,
}

/// Occurrence counts, most frequent first; ties in key order.
fn value_counts<I>(items: I) -> Vec<(String, usize)>
where
    I: IntoIterator,
    I::Item: ToString,
{
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for item in items {
        *counts.entry(item.to_string()).or_default() += 1;
    }
    let mut counts: Vec<(String, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

fn recovery_rate(rows: &[&CaseRow]) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    let recovered = rows.iter().filter(|r| r.outcome == Outcome::Recovered).count();
    100.0 * recovered as f64 / rows.len() as f64
}

impl CohortStats {
    pub fn from_rows(rows: &[CaseRow]) -> Self {
        let methb: Vec<f64> = rows.iter().filter_map(|r| r.methb_level).collect();
        let ages: Vec<f64> = rows.iter().filter_map(|r| r.age).map(f64::from).collect();

        Self {
            records: rows.len(),
            methb: Distribution::describe(&methb),
            age: Distribution::describe(&ages),
            genders: value_counts(rows.iter().filter_map(|r| r.gender)),
            triggers: value_counts(rows.iter().map(|r| r.trigger).filter(|t| t.is_known())),
            treatments: value_counts(rows.iter().flat_map(|r| r.treatment.items().iter().copied())),
            outcomes: value_counts(rows.iter().map(|r| r.outcome)),
            trigger_profiles: trigger_profiles(rows),
            age_groups: age_groups(rows),
            methylene_blue: methylene_blue_outcomes(rows),
        }
    }

    /// Triggers whose mean MetHb exceeds [`HIGH_RISK_MEAN_METHB`].
    pub fn high_risk_triggers(&self) -> impl Iterator<Item = &TriggerProfile> {
        self.trigger_profiles.iter().filter(|p| p.high_risk)
    }
}

fn trigger_profiles(rows: &[CaseRow]) -> Vec<TriggerProfile> {
    let mut profiles: Vec<TriggerProfile> = Trigger::ALL
        .iter()
        .filter_map(|&trigger| {
            let levels: Vec<f64> = rows
                .iter()
                .filter(|r| r.trigger == trigger)
                .filter_map(|r| r.methb_level)
                .collect();
            let methb = Distribution::describe(&levels)?;
            Some(TriggerProfile {
                trigger,
                high_risk: methb.mean > HIGH_RISK_MEAN_METHB,
                methb,
            })
        })
        .collect();

    profiles.sort_by(|a, b| b.methb.mean.total_cmp(&a.methb.mean));
    profiles
}

fn age_groups(rows: &[CaseRow]) -> Vec<AgeGroup> {
    AGE_GROUPS
        .iter()
        .filter_map(|&(label, low, high)| {
            let members: Vec<&CaseRow> = rows
                .iter()
                .filter(|r| r.age.is_some_and(|a| a > low && a <= high))
                .collect();
            if members.is_empty() {
                return None;
            }
            let levels: Vec<f64> = members.iter().filter_map(|r| r.methb_level).collect();
            Some(AgeGroup {
                label,
                cases: members.len(),
                mean_methb: mean(&levels),
                recovery_rate: recovery_rate(&members),
            })
        })
        .collect()
}

fn methylene_blue_outcomes(rows: &[CaseRow]) -> Option<MethyleneBlueOutcomes> {
    let cases: Vec<&CaseRow> = rows
        .iter()
        .filter(|r| r.treatment.contains(Treatment::MethyleneBlue))
        .collect();
    if cases.is_empty() {
        return None;
    }

    let levels: Vec<f64> = cases.iter().filter_map(|r| r.methb_level).collect();

    Some(MethyleneBlueOutcomes {
        cases: cases.len(),
        recovered: cases.iter().filter(|r| r.outcome == Outcome::Recovered).count(),
        recovery_rate: recovery_rate(&cases),
        mean_methb: mean(&levels),
        doses: value_counts(cases.iter().filter_map(|r| r.methylene_blue_dose.as_deref())),
        response_times: value_counts(cases.iter().filter_map(|r| r.time_to_improvement.as_deref())),
    })
}

fn write_counts(f: &mut fmt::Formatter<'_>, title: &str, counts: &[(String, usize)]) -> fmt::Result {
    write!(f, "\n{title}:")?;
    if counts.is_empty() {
        return write!(f, " none");
    }
    for (label, count) in counts {
        write!(f, "\n  {label}: {count}")?;
    }
    Ok(())
}

impl fmt::Display for CohortStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Records: {}", self.records)?;

        match &self.methb {
            Some(d) => {
                write!(
                    f,
                    "\nMetHb levels (n={}): mean {:.1}%, median {:.1}%, range {:.1}-{:.1}%",
                    d.n, d.mean, d.median, d.min, d.max
                )?;
                if let Some(sd) = d.std_dev {
                    write!(f, ", std dev {sd:.1}%")?;
                }
            }
            None => write!(f, "\nMetHb levels: none extracted")?,
        }

        match &self.age {
            Some(d) => write!(
                f,
                "\nAge (n={}): mean {:.1}, median {:.1}, range {}-{}",
                d.n, d.mean, d.median, d.min, d.max
            )?,
            None => write!(f, "\nAge: none extracted")?,
        }

        write_counts(f, "Gender", &self.genders)?;
        write_counts(f, "Triggers", &self.triggers)?;
        write_counts(f, "Treatments", &self.treatments)?;
        write_counts(f, "Outcomes", &self.outcomes)?;

        if !self.trigger_profiles.is_empty() {
            write!(f, "\nMetHb by trigger:")?;
            for p in &self.trigger_profiles {
                write!(
                    f,
                    "\n  {}: n={}, mean {:.1}%, max {:.1}%{}",
                    p.trigger,
                    p.methb.n,
                    p.methb.mean,
                    p.methb.max,
                    if p.high_risk { " (high risk)" } else { "" }
                )?;
            }
        }

        if !self.age_groups.is_empty() {
            write!(f, "\nAge groups:")?;
            for g in &self.age_groups {
                write!(f, "\n  {}: {} cases, recovery {:.1}%", g.label, g.cases, g.recovery_rate)?;
                if let Some(m) = g.mean_methb {
                    write!(f, ", mean MetHb {m:.1}%")?;
                }
            }
        }

        if let Some(mb) = &self.methylene_blue {
            write!(
                f,
                "\nMethylene blue: {} cases, recovered {}/{} ({:.1}%)",
                mb.cases, mb.recovered, mb.cases, mb.recovery_rate
            )?;
            if let Some(m) = mb.mean_methb {
                write!(f, ", mean MetHb {m:.1}%")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{G6pdStatus, Gender, Route, SourceType, Symptoms, Treatments};

    fn row(id: &str, trigger: Trigger, methb: Option<f64>, age: Option<u32>, outcome: Outcome) -> CaseRow {
        CaseRow {
            id: id.into(),
            methb_level: methb,
            trigger,
            trigger_route: Route::Unknown,
            treatment: Treatments::new(vec![Treatment::MethyleneBlue]),
            methylene_blue_dose: Some("1".into()),
            symptoms: Symptoms::default(),
            age,
            gender: Some(Gender::Female),
            g6pd_status: G6pdStatus::NotMentioned,
            time_to_improvement: None,
            outcome,
            data_quality_score: 86,
            source_file: format!("abstract_{id}.txt"),
            source_type: SourceType::Abstract,
        }
    }

    fn cohort() -> Vec<CaseRow> {
        vec![
            row("1", Trigger::Dapsone, Some(20.0), Some(30), Outcome::Recovered),
            row("2", Trigger::Dapsone, Some(30.0), Some(8), Outcome::Recovered),
            row("3", Trigger::Benzocaine, Some(50.0), Some(65), Outcome::Fatal),
            row("4", Trigger::Unknown, None, None, Outcome::Unknown),
        ]
    }

    #[test]
    fn test_distribution() {
        let d = Distribution::describe(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(d.n, 4);
        assert_eq!(d.mean, 2.5);
        assert_eq!(d.median, 2.5);
        assert_eq!((d.min, d.max), (1.0, 4.0));
        let sd = d.std_dev.unwrap();
        assert!((sd - 1.290_994).abs() < 1e-6);

        let single = Distribution::describe(&[7.0]).unwrap();
        assert_eq!(single.median, 7.0);
        assert_eq!(single.std_dev, None);
        assert!(Distribution::describe(&[]).is_none());
    }

    #[test]
    fn test_counts_exclude_unknown_trigger() {
        let stats = CohortStats::from_rows(&cohort());

        assert_eq!(stats.records, 4);
        assert_eq!(
            stats.triggers,
            vec![("Dapsone".to_string(), 2), ("Benzocaine".to_string(), 1)]
        );
        assert_eq!(stats.outcomes[0], ("Recovered".to_string(), 2));
        assert_eq!(stats.treatments, vec![("Methylene Blue".to_string(), 4)]);
        assert_eq!(stats.methb.as_ref().unwrap().n, 3);
    }

    #[test]
    fn test_trigger_profiles_sorted_by_mean() {
        let stats = CohortStats::from_rows(&cohort());

        let order: Vec<Trigger> = stats.trigger_profiles.iter().map(|p| p.trigger).collect();
        assert_eq!(order, vec![Trigger::Benzocaine, Trigger::Dapsone]);

        let high: Vec<Trigger> = stats.high_risk_triggers().map(|p| p.trigger).collect();
        assert_eq!(high, vec![Trigger::Benzocaine]);
    }

    #[test]
    fn test_age_groups() {
        let stats = CohortStats::from_rows(&cohort());
        let labels: Vec<&str> = stats.age_groups.iter().map(|g| g.label).collect();
        assert_eq!(labels, vec!["<18", "18-40", "60+"]);
        assert_eq!(stats.age_groups[2].recovery_rate, 0.0);
    }

    #[test]
    fn test_methylene_blue_outcomes() {
        let stats = CohortStats::from_rows(&cohort());
        let mb = stats.methylene_blue.unwrap();

        assert_eq!(mb.cases, 4);
        assert_eq!(mb.recovered, 2);
        assert_eq!(mb.recovery_rate, 50.0);
        assert_eq!(mb.doses, vec![("1".to_string(), 4)]);
        assert!(mb.response_times.is_empty());
    }

    #[test]
    fn test_empty_cohort() {
        let stats = CohortStats::from_rows(&[]);
        assert!(stats.methb.is_none());
        assert!(stats.methylene_blue.is_none());
        assert!(stats.to_string().contains("MetHb levels: none extracted"));
    }
}
