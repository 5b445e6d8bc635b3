use std::fmt::Write;

use crate::dashboard::view::{DashboardReport, DashboardView, SummaryTable};
use crate::dashboard::DashboardInput;

use super::chart::{candle_chart_svg, oscillator_chart_svg, DEFAULT_SIZE};

const PAGE_TITLE: &str = "Stock Price Analysis";

const STYLE: &str = "body{font-family:sans-serif;max-width:1000px;margin:2em auto;color:#222}\
form{display:flex;gap:1em;align-items:end;flex-wrap:wrap;margin-bottom:1.5em}\
label{display:flex;flex-direction:column;font-size:.9em}\
.info{background:#e8f1fb;border-left:4px solid #1f77b4;padding:.8em}\
.warning{background:#fff6e0;border-left:4px solid #e5a100;padding:.8em}\
.detail{color:#777;font-size:.8em}\
table{border-collapse:collapse;margin:1em 0}\
th,td{border:1px solid #ccc;padding:.4em 1em;text-align:left}";

/// Minimal HTML text escaping for values echoed back into the page.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn input_form(out: &mut String, input: &DashboardInput) {
    // Any widget change re-submits the form, which re-runs the whole pipeline.
    let _ = write!(
        out,
        r#"<form method="get" action="/">
<label>Enter Stock Ticker<input type="text" name="ticker" value="{ticker}" onchange="this.form.submit()"></label>
<label>Start Date<input type="date" name="start" value="{start}" onchange="this.form.submit()"></label>
<label>End Date<input type="date" name="end" value="{end}" onchange="this.form.submit()"></label>
<button type="submit">Analyze</button>
</form>
"#,
        ticker = escape_html(&input.ticker),
        start = input.start.format("%Y-%m-%d"),
        end = input.end.format("%Y-%m-%d"),
    );
}

fn summary_table(out: &mut String, table: &SummaryTable) {
    let _ = write!(
        out,
        "<h3>{}</h3>\n<table>\n<thead><tr><th>{}</th><th>{}</th></tr></thead>\n<tbody>\n",
        escape_html(&table.title),
        escape_html(&table.columns[0]),
        escape_html(&table.columns[1]),
    );
    for row in &table.rows {
        let _ = writeln!(
            out,
            "<tr><td>{}</td><td>{}</td></tr>",
            escape_html(&row.metric),
            escape_html(&row.value)
        );
    }
    out.push_str("</tbody>\n</table>\n");
}

fn chart_block(out: &mut String, svg: anyhow::Result<String>, what: &str) {
    match svg {
        Ok(svg) => {
            out.push_str("<figure>\n");
            out.push_str(&svg);
            out.push_str("\n</figure>\n");
        }
        Err(e) => {
            tracing::error!(chart = what, error = %format!("{:#}", e), "Chart rendering failed");
            let _ = writeln!(
                out,
                r#"<div class="warning">Could not render the {} chart.</div>"#,
                escape_html(what)
            );
        }
    }
}

fn report_body(out: &mut String, report: &DashboardReport) {
    let _ = writeln!(out, "<h2>{}</h2>", escape_html(&report.heading));

    let _ = writeln!(out, "<h3>{}</h3>", escape_html(&report.price_chart.title));
    chart_block(
        out,
        candle_chart_svg(&report.price_chart, DEFAULT_SIZE),
        "price",
    );

    summary_table(out, &report.summary);

    out.push_str("<h3>Relative Strength Index (RSI)</h3>\n");
    chart_block(
        out,
        oscillator_chart_svg(&report.rsi_chart, DEFAULT_SIZE),
        "RSI",
    );
}

/// The whole dashboard page: input widgets followed by the view for them.
pub fn render_page(input: &DashboardInput, view: &DashboardView) -> String {
    let mut out = String::with_capacity(64 * 1024);
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{PAGE_TITLE}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<h1>{PAGE_TITLE}</h1>\n"
    );
    input_form(&mut out, input);

    match view {
        DashboardView::AwaitingTicker { message } => {
            let _ = writeln!(out, r#"<div class="info">{}</div>"#, escape_html(message));
        }
        DashboardView::NoData {
            ticker,
            warning,
            detail,
        } => {
            let _ = writeln!(
                out,
                "<h2>Stock Analysis for {}</h2>\n<div class=\"warning\">{}</div>",
                escape_html(ticker),
                escape_html(warning)
            );
            if let Some(detail) = detail {
                let _ = writeln!(out, r#"<p class="detail">{}</p>"#, escape_html(detail));
            }
        }
        DashboardView::Rendered(report) => report_body(&mut out, report),
    }

    out.push_str("</body>\n</html>\n");
    out
}
