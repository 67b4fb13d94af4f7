//! services/reader/src/console/render.rs
//!
//! Renders the shell state as a plain-text page.

use maidat_core::{DailyContent, ShellState, ViewState};
use std::fmt::Write;

const TITLE: &str = "مائدة النور";
const SUBTITLE: &str = "برنامج رمضاني بروحية أهل البيت (ع)";
const LOADING: &str = "جاري إيقاد شموع المائدة...";
const RETRY_LABEL: &str = "إعادة المحاولة";
const RULE: &str = "────────────────────────────────────────";

/// Renders the full page: header, day selector, current view and navigation.
pub fn render_page(state: &ShellState) -> String {
    let mut out = String::new();
    render_header(&mut out, state);
    match state.view() {
        ViewState::Loading => {
            let _ = writeln!(out, "\n  {LOADING}\n");
        }
        ViewState::Error(message) => {
            let _ = writeln!(out, "\n  ! {message}");
            let _ = writeln!(out, "  [{RETRY_LABEL}: retry]\n");
        }
        ViewState::Ready { content, fetched_at } => {
            render_content(&mut out, content);
            let _ = writeln!(out, "  ({})", fetched_at.format("%Y-%m-%d %H:%M UTC"));
        }
    }
    render_navigation(&mut out, state);
    out
}

fn render_header(out: &mut String, state: &ShellState) {
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "  {TITLE}");
    let _ = writeln!(out, "  {SUBTITLE}");
    let _ = writeln!(out, "  المجلس: {} رمضان", state.day());
    let _ = writeln!(out, "{RULE}");
}

fn section(out: &mut String, heading: &str) {
    let _ = writeln!(out, "\n■ {heading}");
}

fn render_content(out: &mut String, content: &DailyContent) {
    let _ = writeln!(out, "\n  «{}»", content.introduction.verse);
    let _ = writeln!(out, "  {}", content.introduction.reflection);

    section(out, "محراب الليلة");
    let _ = writeln!(out, "  {}", content.mihrab.dua_passage);
    let _ = writeln!(out, "  {}", content.mihrab.reflection);

    section(out, "زاد الصائم");
    let _ = writeln!(out, "  نصيحة صحية: {}", content.zad);

    section(out, &format!("سيرة وموقف: {}", content.sira.title));
    let _ = writeln!(out, "  {}", content.sira.story);
    let _ = writeln!(out, "  رؤية معاصرة (القرن الـ21): {}", content.sira.modern_application);

    section(out, "فقه الحياة");
    let _ = writeln!(out, "  س: {}", content.fiqh.question);
    let _ = writeln!(out, "  ج: {}", content.fiqh.answer);

    let _ = writeln!(out, "\n{RULE}");
    let _ = writeln!(out, "  {}", content.closing_prayer);
    let _ = writeln!(out, "  تقبل الله صيامكم وقيامكم");
}

fn render_navigation(out: &mut String, state: &ShellState) {
    let prev = if state.can_go_prev() { "[prev]" } else { "[prev: disabled]" };
    let next = if state.can_go_next() { "[next]" } else { "[next: disabled]" };
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "  {prev}  {next}  [day <1-30>]  [quit]");
}
