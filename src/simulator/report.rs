//! Simulation report generation.

use super::runner::RunStats;
use crate::items::ItemId;
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregated results from multiple simulation runs.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub num_runs: u32,
    pub total_encounters: u64,
    pub total_victories: u64,
    pub total_defeats: u64,
    pub total_flees: u64,
    pub total_stalemates: u64,

    // Aggregated stats
    pub win_rate: f64,
    pub avg_turns_per_encounter: f64,
    pub avg_final_level: f64,
    pub avg_final_gold: f64,
    pub avg_exp_per_run: f64,
    pub avg_potions_per_run: f64,
    pub avg_skills_per_run: f64,
    pub avg_pet_level: Option<f64>,
    pub elite_kills: u64,
    pub boss_kills: u64,

    // Distribution data
    pub level_distribution: BTreeMap<u32, u32>,

    // Loot analysis
    pub drop_counts: BTreeMap<ItemId, u64>,
    pub avg_drops_per_victory: f64,
    pub items_discarded: u64,

    // Individual run stats for detailed analysis
    #[serde(skip)]
    pub run_stats: Vec<RunStats>,
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

impl SimReport {
    /// Create a new report from completed run stats.
    pub fn from_runs(runs: Vec<RunStats>) -> Self {
        let num_runs = runs.len() as u32;
        let n = num_runs as f64;
        let sum = |f: fn(&RunStats) -> u64| runs.iter().map(f).sum::<u64>();

        let total_encounters = sum(|r| r.encounters as u64);
        let total_victories = sum(|r| r.victories as u64);
        let total_defeats = sum(|r| r.defeats as u64);
        let total_flees = sum(|r| r.flees as u64);
        let total_stalemates = sum(|r| r.stalemates as u64);
        let total_turns = sum(|r| r.total_turns);

        let mut level_distribution = BTreeMap::new();
        for run in &runs {
            *level_distribution.entry(run.final_level).or_insert(0) += 1;
        }

        let mut drop_counts = BTreeMap::new();
        for run in &runs {
            for (item, count) in &run.drops {
                *drop_counts.entry(*item).or_insert(0u64) += *count as u64;
            }
        }
        let total_drops: u64 = drop_counts.values().sum();

        let pet_levels: Vec<u32> = runs.iter().filter_map(|r| r.pet_level).collect();
        let avg_pet_level = if pet_levels.is_empty() {
            None
        } else {
            Some(pet_levels.iter().map(|&l| l as f64).sum::<f64>() / pet_levels.len() as f64)
        };

        Self {
            num_runs,
            total_encounters,
            total_victories,
            total_defeats,
            total_flees,
            total_stalemates,
            win_rate: ratio(total_victories as f64, total_encounters as f64),
            avg_turns_per_encounter: ratio(total_turns as f64, total_encounters as f64),
            avg_final_level: ratio(sum(|r| r.final_level as u64) as f64, n),
            avg_final_gold: ratio(sum(|r| r.final_gold) as f64, n),
            avg_exp_per_run: ratio(sum(|r| r.exp_earned) as f64, n),
            avg_potions_per_run: ratio(sum(|r| r.potions_used as u64) as f64, n),
            avg_skills_per_run: ratio(sum(|r| r.skills_cast as u64) as f64, n),
            avg_pet_level,
            elite_kills: sum(|r| r.elite_kills as u64),
            boss_kills: sum(|r| r.boss_kills as u64),
            level_distribution,
            drop_counts,
            avg_drops_per_victory: ratio(total_drops as f64, total_victories as f64),
            items_discarded: sum(|r| r.items_discarded as u64),
            run_stats: runs,
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Runs: {}, encounters: {}\n\n",
            self.num_runs, self.total_encounters
        ));

        report.push_str("── OUTCOMES ─────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Victories:           {}\n", self.total_victories));
        report.push_str(&format!("  Defeats:             {}\n", self.total_defeats));
        report.push_str(&format!("  Fled:                {}\n", self.total_flees));
        report.push_str(&format!("  Stalemates:          {}\n", self.total_stalemates));
        report.push_str(&format!("  Win Rate:            {:.1}%\n", self.win_rate * 100.0));
        report.push_str(&format!("  Elite Kills:         {}\n", self.elite_kills));
        report.push_str(&format!("  Boss Kills:          {}\n", self.boss_kills));
        report.push_str(&format!(
            "  Avg Turns/Encounter: {:.1}\n\n",
            self.avg_turns_per_encounter
        ));

        report.push_str("── PROGRESSION ──────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Final Level:     {:.1}\n", self.avg_final_level));
        report.push_str(&format!("  Avg Exp per Run:     {:.0}\n", self.avg_exp_per_run));
        report.push_str(&format!("  Avg Final Gold:      {:.0}\n", self.avg_final_gold));
        report.push_str(&format!("  Avg Potions Used:    {:.1}\n", self.avg_potions_per_run));
        report.push_str(&format!("  Avg Skills Cast:     {:.1}\n", self.avg_skills_per_run));
        if let Some(pet_level) = self.avg_pet_level {
            report.push_str(&format!("  Avg Pet Level:       {:.1}\n", pet_level));
        }
        report.push('\n');

        report.push_str("── LEVEL DISTRIBUTION ───────────────────────────────────────────\n");
        for (level, count) in &self.level_distribution {
            let pct = ratio(*count as f64, self.num_runs as f64) * 100.0;
            let bar: String = "█".repeat((pct / 5.0) as usize);
            report.push_str(&format!("  Lv {:3}: {:>5.1}% {}\n", level, pct, bar));
        }
        report.push('\n');

        report.push_str("── LOOT ─────────────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Avg Drops/Victory:   {:.3}\n",
            self.avg_drops_per_victory
        ));
        for (item, count) in &self.drop_counts {
            let def = item.def();
            report.push_str(&format!(
                "  {} {:<10} {:>8}  ({})\n",
                def.icon,
                def.name,
                count,
                def.rarity.name()
            ));
        }
        if self.items_discarded > 0 {
            report.push_str(&format!(
                "  ⚠️  {} items discarded on a full bag\n",
                self.items_discarded
            ));
        }

        report.push_str("\n── BALANCE ASSESSMENT ───────────────────────────────────────────\n");
        let rating = if self.win_rate > 0.98 {
            "TOO EASY - Players almost never lose"
        } else if self.win_rate > 0.85 {
            "GOOD - Challenging but fair"
        } else if self.win_rate > 0.6 {
            "HARD - Frequent losses"
        } else {
            "TOO HARD - Most fights are lost"
        };
        report.push_str(&format!("  Rating: {}\n", rating));
        if self.total_stalemates > 0 {
            report.push_str("  ⚠️  Some fights hit the turn cap - defense outscales attack?\n");
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");

        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
