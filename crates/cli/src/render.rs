use chrono::{DateTime, FixedOffset};
use nrank_core::domain::keyword::{KeywordAnalysis, TrendDirection, TrendingKeyword};
use nrank_core::domain::score::{ScoreBand, ScoreKind};
use nrank_core::domain::summary::DashboardSummary;
use nrank_core::view::trending::TrendingState;
use nrank_core::view::{AnalysisViewState, RequestState};
use std::fmt::Write;

const BAR_WIDTH: usize = 24;
const KEYWORD_COLUMNS: usize = 14;
const RULE: &str = "────────────────────────────────────────────────";

pub fn trending_state(state: &TrendingState, now: DateTime<FixedOffset>) -> String {
    match state {
        RequestState::Idle => String::new(),
        RequestState::Loading => "⟳ 실시간 급상승 순위를 불러오는 중...\n".to_string(),
        RequestState::Ready(keywords) => dashboard(keywords, now),
        RequestState::Failed(notice) => format!("⚠ {notice}\n"),
    }
}

pub fn analysis_state(state: &AnalysisViewState) -> String {
    match &state.request {
        RequestState::Idle => String::new(),
        RequestState::Loading => format!(
            "⟳ Gemini AI가 '{}' 키워드 데이터를 분석 중입니다...\n",
            state.input.trim()
        ),
        RequestState::Ready(analysis) => analysis_report(analysis),
        RequestState::Failed(notice) => format!(
            "⚠ {notice} (입력: '{}', 다시 시도하려면 같은 키워드를 재입력하세요)\n",
            state.input.trim()
        ),
    }
}

pub fn dashboard(keywords: &[TrendingKeyword], now: DateTime<FixedOffset>) -> String {
    let summary = DashboardSummary::from_keywords(keywords);
    let mut out = String::new();

    let _ = writeln!(out, "N-Rank.AI 대시보드 · {}", now.format("%Y-%m-%d %H:%M KST"));
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(
        out,
        "총 트래픽 (예상)  {:>12}  Top {} 키워드 기준",
        group_thousands(summary.total_search_volume),
        keywords.len()
    );
    let _ = writeln!(
        out,
        "급상승 키워드     {:>12}  전일 대비 상승",
        summary.rising_count
    );
    let _ = writeln!(
        out,
        "평균 경쟁 강도    {:>12}  메인 키워드 기준",
        summary
            .dominant_competition
            .map(|c| c.as_str())
            .unwrap_or("-")
    );

    let _ = writeln!(out, "\n상위 키워드 검색량 분석");
    let max = summary.chart.iter().map(|b| b.volume).max().unwrap_or(0);
    for bar_row in &summary.chart {
        let marker = if bar_row.highlighted { '*' } else { ' ' };
        let _ = writeln!(
            out,
            "{marker} {} {:<width$} {}",
            pad_to_width(&bar_row.keyword, KEYWORD_COLUMNS),
            bar(bar_row.volume, max, BAR_WIDTH),
            group_thousands(bar_row.volume),
            width = BAR_WIDTH
        );
    }

    let _ = writeln!(out, "\n실시간 급상승 순위");
    if keywords.is_empty() {
        let _ = writeln!(out, "  (표시할 키워드가 없습니다)");
    }
    for k in keywords {
        let _ = writeln!(
            out,
            "[{:>2}] {} {:<6} {:>10} hits  {}",
            k.rank,
            pad_to_width(&k.keyword, KEYWORD_COLUMNS),
            k.competition.as_str(),
            group_thousands(k.search_volume),
            movement(k)
        );
    }
    out
}

pub fn analysis_report(analysis: &KeywordAnalysis) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "키워드 심층 분석: {}", analysis.keyword);
    let _ = writeln!(out, "{RULE}");
    for (kind, score) in [
        (ScoreKind::Difficulty, analysis.difficulty_score),
        (ScoreKind::Potential, analysis.potential_score),
    ] {
        let _ = writeln!(
            out,
            "{:<8} {:>3}/100  {}  ({})",
            kind.title(),
            score,
            ScoreBand::of(score).label(kind),
            kind.description()
        );
    }

    let _ = writeln!(out, "\n계절성 트렌드 (예상)");
    if analysis.seasonal_trend.is_empty() {
        let _ = writeln!(out, "  (데이터 없음)");
    }
    let max = analysis
        .seasonal_trend
        .iter()
        .map(|p| p.volume)
        .max()
        .unwrap_or(0);
    for point in &analysis.seasonal_trend {
        let _ = writeln!(
            out,
            "  {:<6} {:<width$} {}",
            point.month,
            bar(point.volume, max, BAR_WIDTH),
            group_thousands(point.volume),
            width = BAR_WIDTH
        );
    }

    let _ = writeln!(out, "\n연관 키워드");
    if analysis.related_keywords.is_empty() {
        let _ = writeln!(out, "  (없음)");
    } else {
        let tags: Vec<String> = analysis
            .related_keywords
            .iter()
            .map(|k| format!("#{k}"))
            .collect();
        let _ = writeln!(out, "  {}", tags.join("  "));
    }

    let _ = writeln!(out, "\nAI 전략 조언\n  {}", analysis.summary);
    out
}

fn movement(k: &TrendingKeyword) -> String {
    match k.trend {
        TrendDirection::Up => format!("▲ {}", k.change),
        TrendDirection::Down => format!("▼ {}", k.change),
        TrendDirection::Stable => "-".to_string(),
    }
}

fn bar(value: u64, max: u64, width: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let filled = ((value as f64 / max as f64) * width as f64).round() as usize;
    "█".repeat(filled.min(width))
}

// Hangul, CJK and fullwidth forms occupy two terminal columns.
fn char_columns(c: char) -> usize {
    match c as u32 {
        0x1100..=0x115F
        | 0x2E80..=0x303E
        | 0x3041..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xA000..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6 => 2,
        _ => 1,
    }
}

fn display_width(s: &str) -> usize {
    s.chars().map(char_columns).sum()
}

fn pad_to_width(s: &str, columns: usize) -> String {
    let width = display_width(s);
    let mut out = s.to_string();
    out.push_str(&" ".repeat(columns.saturating_sub(width)));
    out
}

pub fn group_thousands(n: u64) -> String {
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
