//! Balance simulator for the standard catalog.
//! Run with: cargo test -p essence-engine simulate_greedy -- --nocapture

#[cfg(test)]
mod tests {
    use crate::config::EngineConfig;
    use crate::engine::catalog::Catalog;
    use crate::engine::logic::{self, PurchaseAmount};
    use crate::engine::pickups;
    use crate::engine::state::{Session, UpgradeKind};

    const CLICKS_PER_SECOND: u32 = 5;

    /// Cheapest payback among unlocked, affordable upgrades.
    /// Click upgrades are valued at `CLICKS_PER_SECOND` clicks a second.
    fn find_best_purchase(session: &Session, now: u64) -> Option<&'static str> {
        let mut best: Option<(f64, &'static str)> = None; // (payback_seconds, id)

        for u in &session.upgrades {
            if u.is_maxed() || !session.is_tier_unlocked(u.def.tier) {
                continue;
            }
            let Some(cost) = logic::quote_cost(session, u.id(), 1, now) else {
                continue;
            };
            if cost > session.ledger.balance {
                continue;
            }
            let gain = match u.def.kind {
                UpgradeKind::Auto => u.power,
                UpgradeKind::Click => u.power * CLICKS_PER_SECOND as f64,
            };
            if gain <= 0.0 {
                continue;
            }
            let payback = cost / gain;
            if best.map_or(true, |(bp, _)| payback < bp) {
                best = Some((payback, u.id()));
            }
        }

        best.map(|(_, id)| id)
    }

    fn report_stats(session: &Session, second: u32, purchases: u32) {
        let now = second as u64 * 1000;
        eprintln!("┌─── {}分{}秒 ───", second / 60, second % 60);
        eprintln!("│ 残高: {}", logic::format_number(session.ledger.balance));
        eprintln!("│ 累計: {}", logic::format_number(session.ledger.lifetime_earned));
        eprintln!(
            "│ 毎秒: {} / クリック: {}",
            logic::format_number(session.per_second(now)),
            logic::format_number(session.per_click(now))
        );
        eprintln!(
            "│ レベル合計: {} / 購入回数: {}",
            session.total_levels(),
            purchases
        );
        let levels: Vec<String> = session
            .upgrades
            .iter()
            .filter(|u| u.level > 0)
            .map(|u| format!("{}×{}", u.def.name, u.level))
            .collect();
        eprintln!("│ {}", levels.join(", "));
        eprintln!(
            "│ 実績: {} / マイルストーン: {}",
            session.unlocked_achievements.len(),
            session.milestone_index
        );
        if let Some(id) = find_best_purchase(session, now) {
            eprintln!("│ 次の購入候補: {id}");
        }
        eprintln!("└────────────────────────────────────");
    }

    /// Simulate greedy play for `total_seconds` and return the final session.
    fn simulate(total_seconds: u32) -> Session {
        let config = EngineConfig {
            rng_seed: Some(7),
            ..EngineConfig::default()
        };
        let ticks_per_second = config.tick_rate_hz;
        let mut session = Session::new(config, Catalog::standard(), 0).unwrap();

        let mut total_purchases: u32 = 0;
        let mut last_purchase_time: u32 = 0;
        let mut max_idle_gap: u32 = 0;

        let report_times = [60, 300, 600, 1800, 3600];
        let mut next_report_idx = 0;

        eprintln!("\n========================================");
        eprintln!("  Essence バランスシミュレーター");
        eprintln!("  プレイ時間: {}分", total_seconds / 60);
        eprintln!("  クリック速度: {}/秒", CLICKS_PER_SECOND);
        eprintln!("========================================\n");

        for second in 1..=total_seconds {
            let now = second as u64 * 1000;

            for _ in 0..CLICKS_PER_SECOND {
                logic::click(&mut session, now);
            }
            logic::tick(&mut session, ticks_per_second, now);

            let ids: Vec<u64> = session.pickups.iter().map(|p| p.id).collect();
            for id in ids {
                pickups::claim_pickup(&mut session, id, now);
            }
            while session.next_notification().is_some() {}

            let mut bought_this_second = false;
            for _ in 0..20 {
                let Some(id) = find_best_purchase(&session, now) else {
                    break;
                };
                if !logic::buy_upgrade(&mut session, id, PurchaseAmount::Levels(1), now) {
                    break;
                }
                bought_this_second = true;
                total_purchases += 1;
            }

            if bought_this_second {
                max_idle_gap = max_idle_gap.max(second - last_purchase_time);
                last_purchase_time = second;
            }

            if next_report_idx < report_times.len() && second >= report_times[next_report_idx] {
                report_stats(&session, second, total_purchases);
                next_report_idx += 1;
            }
        }

        eprintln!("\n======== 最終サマリー ========");
        report_stats(&session, total_seconds, total_purchases);
        eprintln!("最大待ち時間: {}秒", max_idle_gap);
        eprintln!("保留中のプレステージ: {}", session.pending_prestige_points());
        eprintln!("==============================\n");

        session
    }

    #[test]
    fn simulate_greedy_10min() {
        let session = simulate(600);
        assert!(session.is_tier_unlocked(1));
        assert!(session.ledger.lifetime_earned > 10_000.0);
        assert!(session.per_second(600_000) > 0.0);
    }

    #[test]
    fn simulate_greedy_1hour() {
        let session = simulate(3600);
        assert!(session.total_levels() >= 75);
        assert!(session.is_tier_unlocked(2));
        assert!(session.ledger.lifetime_earned > 1_000_000.0);
        assert!(session.pending_prestige_points() >= 1.0);
    }
}
