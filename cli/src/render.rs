//! Plain-text tables for terminal output.

use stakebook_execution::{
    format_currency, format_percentage, format_roi, BackerSummary, CurrencyFormat, OfferPreview,
};
use std::fmt::Write;

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    for (idx, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if idx > 0 {
            out.push_str("  ");
        }
        if idx == 0 {
            let _ = write!(out, "{cell:<width$}");
        } else {
            let _ = write!(out, "{cell:>width$}");
        }
    }
    out.push('\n');
}

fn push_table(out: &mut String, header: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let header: Vec<String> = header.iter().map(|h| h.to_string()).collect();
    push_row(out, &header, &widths);
    for row in rows {
        push_row(out, row, &widths);
    }
}

/// Summary block plus a payout table per offer.
pub fn preview_table(previews: &[OfferPreview], currency: &CurrencyFormat) -> String {
    let mut out = String::new();
    for (idx, preview) in previews.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        let results = &preview.results;
        let _ = writeln!(out, "offer {}", preview.offer_id);
        let _ = writeln!(
            out,
            "  prize {}  net {}  sold {}  player {} ({})",
            format_currency(results.prize_amount, currency),
            format_currency(results.net_prize, currency),
            format_percentage(results.total_percentage_sold),
            format_percentage(results.player_percentage),
            format_currency(results.player_profit, currency),
        );
        if results.payouts.is_empty() {
            continue;
        }
        let rows: Vec<Vec<String>> = results
            .payouts
            .iter()
            .map(|p| {
                vec![
                    p.backer_name.clone(),
                    format_currency(p.investment_amount, currency),
                    format_currency(p.payout, currency),
                    format_roi(p.roi),
                ]
            })
            .collect();
        push_table(&mut out, &["backer", "invested", "payout", "roi"], &rows);
    }
    out
}

pub fn ledger_table(summaries: &[BackerSummary], currency: &CurrencyFormat) -> String {
    let rows: Vec<Vec<String>> = summaries
        .iter()
        .map(|s| {
            vec![
                s.backer_name.clone(),
                s.offers.to_string(),
                format_currency(s.total_invested, currency),
                format_currency(s.total_payout, currency),
                format_currency(s.net_profit, currency),
                format_roi(s.roi),
            ]
        })
        .collect();
    let mut out = String::new();
    push_table(
        &mut out,
        &["backer", "offers", "invested", "payout", "profit", "roi"],
        &rows,
    );
    out
}
