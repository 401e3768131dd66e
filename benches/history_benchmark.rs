use chrono::{Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use dustbin_rewards::models::{merge_history, LedgerAction, LedgerEntry, Redemption};
use std::hint::black_box;

/// A long-lived account: a scan every 5 minutes with a redemption every tenth scan.
fn build_history(scans: usize) -> (Vec<LedgerEntry>, Vec<Redemption>) {
    let t0 = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let mut entries = Vec::with_capacity(scans + scans / 10 + 1);
    let mut redemptions = Vec::with_capacity(scans / 10);

    entries.push(LedgerEntry {
        action: LedgerAction::WelcomeBonus,
        points: 100,
        description: "Welcome bonus".to_string(),
        timestamp: t0,
    });

    for i in 0..scans {
        let at = t0 + Duration::minutes(5 * (i as i64 + 1));
        entries.push(LedgerEntry {
            action: LedgerAction::QrScan,
            points: 1000,
            description: "Scanned Dust Bin QR (https://qrco.de/bgBWbc...)".to_string(),
            timestamp: at,
        });

        if i % 10 == 9 {
            entries.push(LedgerEntry {
                action: LedgerAction::CouponRedeem,
                points: -100,
                description: "Redeemed 10% Off at Green Mart".to_string(),
                timestamp: at,
            });
            redemptions.push(Redemption {
                coupon_id: "coupon1".to_string(),
                coupon_name: "10% Off at Green Mart".to_string(),
                points_used: 100,
                redeemed_at: at,
            });
        }
    }

    (entries, redemptions)
}

fn benchmark_merge_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_history");

    for scans in [10, 1_000] {
        let (entries, redemptions) = build_history(scans);
        group.bench_function(format!("{scans}_scans"), |b| {
            b.iter(|| merge_history(black_box(&entries), black_box(&redemptions)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_merge_history);
criterion_main!(benches);
