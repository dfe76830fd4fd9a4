use crate::canvas::{Canvas, FontState};
use crate::config::VoltieConfig;
use crate::status::BatteryStatus;

pub struct PanelState {
    pub config: VoltieConfig,
    pub status: BatteryStatus,
}

/// Label/value rows for the enabled display fields, in panel order.
pub fn lines<'a>(config: &VoltieConfig, status: &'a BatteryStatus) -> Vec<(&'static str, &'a str)> {
    let d = &config.display;
    let mut rows = Vec::new();
    if d.show_source {
        rows.push(("source", status.power_supply_type));
    }
    if d.show_chemistry {
        rows.push(("chemistry", status.chemistry.as_str()));
    }
    if d.show_percentage {
        rows.push(("charge", status.battery_life_percent.as_str()));
    }
    if d.show_saving_mode {
        rows.push(("saving", status.power_saving_mode));
    }
    if d.show_full_time {
        rows.push(("full charge", status.battery_full_life_time.as_str()));
    }
    if d.show_remaining_time {
        rows.push(("remaining", status.battery_life_time.as_str()));
    }
    rows
}

/// Compute the panel size from worst-case field texts so the window does not
/// jitter as live values change.
pub fn compute_size(config: &VoltieConfig, font: &FontState) -> (u32, u32) {
    let widest = BatteryStatus {
        power_supply_type: "connected to power source",
        chemistry: "unknown".into(),
        battery_life_percent: "100".into(),
        power_saving_mode: "off",
        battery_full_life_time: "23 h 59 min".into(),
        battery_life_time: "23 h 59 min".into(),
    };

    let size = config.display.font_size;
    let padding = size * 0.6;
    let line_h = size * 1.4;
    let icon_w = size * 2.2;

    let mut text_w = 0.0f32;
    let rows = lines(config, &widest);
    for (label, value) in &rows {
        let (w, _) = font.measure_text(&format!("{}  {}", label, value), size);
        if w > text_w { text_w = w; }
    }

    let width = (text_w.max(icon_w) + padding * 2.0).ceil() as u32;
    let height = (padding * 2.0 + size * 1.3 + rows.len() as f32 * line_h).ceil() as u32;
    (width.max(40), height.max(24))
}

pub fn render(canvas: &mut Canvas, state: &PanelState, font: &FontState) {
    let config = &state.config;
    let theme = &config.theme;
    let size = config.display.font_size;
    let padding = size * 0.6;
    let line_h = size * 1.4;

    canvas.clear(theme.bg_color);

    draw_battery_icon(canvas, state, padding, padding);

    let mut y = padding + size * 1.3;
    for (label, value) in lines(config, &state.status) {
        let label_text = format!("{}  ", label);
        let (lw, _) = font.measure_text(&label_text, size);
        font.draw_text(canvas, &label_text, padding, y, size, theme.label_color);
        font.draw_text(canvas, value, padding + lw, y, size, theme.fg_color);
        y += line_h;
    }
}

/// Battery glyph: outline, terminal nub, charge-colored fill, bolt when on AC.
fn draw_battery_icon(canvas: &mut Canvas, state: &PanelState, x: f32, y: f32) {
    let config = &state.config;
    let theme = &config.theme;
    let size = config.display.font_size;

    let icon_h = size;
    let icon_w = icon_h * 1.8;
    let cap_w = icon_w * 0.08;
    let cap_h = icon_h * 0.35;
    let border = (icon_h * 0.08).max(1.5);

    let percent = state.status.battery_life_percent.parse::<u8>().ok();
    let charging = state.status.power_supply_type == "connected to power source";

    let outline = theme.fg_color;
    canvas.draw_line(x, y, x + icon_w, y, outline, border);
    canvas.draw_line(x, y + icon_h, x + icon_w, y + icon_h, outline, border);
    canvas.draw_line(x, y, x, y + icon_h, outline, border);
    canvas.draw_line(x + icon_w, y, x + icon_w, y + icon_h, outline, border);

    let nub_y = y + (icon_h - cap_h) / 2.0;
    canvas.fill_rect(x + icon_w, nub_y, cap_w, cap_h, outline);

    if let Some(percent) = percent {
        let fill_color = if percent > 50 {
            theme.charge_good_color
        } else if percent > 20 {
            theme.charge_warn_color
        } else {
            theme.charge_crit_color
        };
        let inner_margin = border + 1.0;
        let inner_w = icon_w - inner_margin * 2.0;
        let fill_w = inner_w * (percent.min(100) as f32 / 100.0);
        if fill_w > 0.0 {
            canvas.fill_rect(
                x + inner_margin,
                y + inner_margin,
                fill_w,
                icon_h - inner_margin * 2.0,
                fill_color,
            );
        }
    }

    if charging {
        let bolt: [u8; 4] = [0xFF, 0xFF, 0xFF, 0xFF];
        let cx = x + icon_w / 2.0;
        let cy = y + icon_h / 2.0;
        let bh = icon_h * 0.35;
        let bw = icon_w * 0.12;
        let stroke = (border * 0.8).max(1.0);

        canvas.draw_line(cx + bw * 0.3, cy - bh, cx - bw * 0.5, cy + bh * 0.1, bolt, stroke);
        canvas.draw_line(cx - bw * 0.5, cy + bh * 0.1, cx + bw * 0.5, cy - bh * 0.1, bolt, stroke);
        canvas.draw_line(cx + bw * 0.5, cy - bh * 0.1, cx - bw * 0.3, cy + bh, bolt, stroke);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DisplayConfig;

    #[test]
    fn lines_follow_display_toggles() {
        let mut config = VoltieConfig::default();
        let status = BatteryStatus::placeholder();
        assert_eq!(lines(&config, &status).len(), 6);

        config.display = DisplayConfig {
            show_chemistry: false,
            show_full_time: false,
            ..DisplayConfig::default()
        };
        let rows = lines(&config, &status);
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|(label, _)| *label != "chemistry" && *label != "full charge"));
    }

    #[test]
    fn panel_rows_show_snapshot_values() {
        let config = VoltieConfig::default();
        let status = BatteryStatus {
            power_supply_type: "on battery",
            chemistry: "Li-ion".into(),
            battery_life_percent: "42".into(),
            power_saving_mode: "on",
            battery_full_life_time: "5 h 0 min".into(),
            battery_life_time: "1 h 2 min".into(),
        };
        let rows = lines(&config, &status);
        assert_eq!(rows[0], ("source", "on battery"));
        assert_eq!(rows[2], ("charge", "42"));
        assert_eq!(rows[5], ("remaining", "1 h 2 min"));
    }
}
