use crate::estimator::{estimate, Advisory, EstimateOutcome};
use crate::features::{FuelType, SellerType, Transmission};
use crate::form::{CarForm, KMS_STEP, MIN_PRESENT_PRICE, PRESENT_PRICE_STEP};
use crate::format::{format_lakhs, format_rupees};
use crate::model::{ModelHandle, ModelSource};
use eframe::egui;
use egui::{Color32, Context, FontFamily, FontId, Margin, RichText, Stroke, Vec2, Visuals};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

const HEADING: Color32 = Color32::from_rgb(44, 62, 80);
const ACCENT: Color32 = Color32::from_rgb(52, 152, 219);
const ACCENT_HOVER: Color32 = Color32::from_rgb(41, 128, 185);
const SUCCESS: Color32 = Color32::from_rgb(39, 174, 96);
const WARNING: Color32 = Color32::from_rgb(211, 84, 0);

pub fn set_custom_style(ctx: &Context) {
    let mut visuals = Visuals::light();

    visuals.panel_fill = Color32::from_rgb(245, 247, 250);
    visuals.window_fill = Color32::WHITE;
    visuals.extreme_bg_color = Color32::WHITE;
    visuals.faint_bg_color = Color32::from_rgb(236, 240, 244);

    visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, Color32::from_rgb(189, 195, 199));

    visuals.widgets.hovered.bg_stroke = Stroke::new(1.5, ACCENT_HOVER);

    visuals.widgets.active.bg_stroke = Stroke::new(2.0, HEADING);

    visuals.selection.bg_fill = Color32::from_rgb(174, 214, 241);
    visuals.selection.stroke = Stroke::new(1.0, HEADING);

    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();

    style.spacing.item_spacing = egui::vec2(8.0, 8.0);
    style.spacing.window_margin = Margin::same(16);
    style.spacing.button_padding = egui::vec2(24.0, 10.0);

    style.text_styles.insert(
        egui::TextStyle::Body,
        FontId::new(15.0, FontFamily::Proportional),
    );
    style.text_styles.insert(
        egui::TextStyle::Heading,
        FontId::new(24.0, FontFamily::Proportional),
    );
    style.text_styles.insert(
        egui::TextStyle::Button,
        FontId::new(18.0, FontFamily::Proportional),
    );

    ctx.set_style(style);
}

pub struct PredictorApp {
    form: CarForm,
    model: Option<ModelHandle>,
    source: ModelSource,
    outcome: Option<EstimateOutcome>,
}

impl PredictorApp {
    pub fn new(model: Option<ModelHandle>, source: ModelSource) -> Self {
        Self {
            form: CarForm::default(),
            model,
            source,
            outcome: None,
        }
    }

    pub fn form_mut(&mut self) -> &mut CarForm {
        &mut self.form
    }

    pub fn outcome(&self) -> Option<&EstimateOutcome> {
        self.outcome.as_ref()
    }

    /// Runs one prediction for the current form. Never panics; failures end
    /// up in the outcome.
    pub fn submit(&mut self) {
        let features = self.form.to_features();
        let outcome = estimate(self.model.as_deref(), &features);
        self.outcome = Some(outcome);
    }

    pub fn show(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("title").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.vertical_centered(|ui| {
                ui.heading(RichText::new("🚘 Car Selling Price Prediction")
                    .color(HEADING)
                    .strong()
                );
                ui.label("Enter your car details below to get a model-based price estimate.");
            });
            ui.add_space(6.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                if let Some(warning) = self.source.warning() {
                    ui.label(RichText::new(format!("⚠ {warning}")).color(WARNING));
                    ui.separator();
                }

                self.form_ui(ui);

                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.add_sized(
                        Vec2::new(200.0, 40.0),
                        egui::Button::new(RichText::new("🔮 Predict Price")
                            .color(Color32::WHITE)
                            .strong())
                            .fill(ACCENT)
                    ).clicked() {
                        self.submit();
                    }
                });
                ui.add_space(8.0);

                if let Some(outcome) = &self.outcome {
                    ui.separator();
                    result_ui(ui, outcome);
                }
            });
        });
    }

    fn form_ui(&mut self, ui: &mut egui::Ui) {
        let form = &mut self.form;

        ui.columns(2, |cols| {
            let left = &mut cols[0];
            left.label("📅 Year of the Car");
            egui::ComboBox::from_id_salt("year")
                .selected_text(form.year.to_string())
                .show_ui(left, |ui| {
                    for y in CarForm::year_options() {
                        ui.selectable_value(&mut form.year, y, y.to_string());
                    }
                });

            left.label("💵 Present Price (in Lakhs)");
            left.add(egui::DragValue::new(&mut form.present_price)
                .range(MIN_PRESENT_PRICE..=f64::MAX)
                .speed(PRESENT_PRICE_STEP)
                .fixed_decimals(2));

            left.label("📍 Kilometers Driven");
            left.add(egui::DragValue::new(&mut form.kms_driven)
                .range(0.0..=f64::MAX)
                .speed(KMS_STEP)
                .fixed_decimals(0));

            let right = &mut cols[1];
            right.label("⛽ Fuel Type");
            egui::ComboBox::from_id_salt("fuel_type")
                .selected_text(form.fuel_type.label())
                .show_ui(right, |ui| {
                    for f in FuelType::ALL {
                        ui.selectable_value(&mut form.fuel_type, f, f.label());
                    }
                });

            right.label("👤 Seller Type");
            egui::ComboBox::from_id_salt("seller_type")
                .selected_text(form.seller_type.label())
                .show_ui(right, |ui| {
                    for s in SellerType::ALL {
                        ui.selectable_value(&mut form.seller_type, s, s.label());
                    }
                });

            right.label("⚙ Transmission");
            egui::ComboBox::from_id_salt("transmission")
                .selected_text(form.transmission.label())
                .show_ui(right, |ui| {
                    for t in Transmission::ALL {
                        ui.selectable_value(&mut form.transmission, t, t.label());
                    }
                });

            right.label("🧑 Previous Owners");
            right.add(egui::DragValue::new(&mut form.owner_count)
                .range(0.0..=f64::MAX)
                .speed(1.0)
                .fixed_decimals(0));
        });
    }
}

fn result_ui(ui: &mut egui::Ui, outcome: &EstimateOutcome) {
    let est = outcome.estimate();

    if let Some(cause) = outcome.failure() {
        ui.label(RichText::new(format!("Prediction failed: {cause}")).color(WARNING));
    }

    ui.label(RichText::new(format!(
        "💰 Estimated Selling Price: {}",
        format_rupees(est.prediction.price_currency)
    ))
        .color(SUCCESS)
        .strong()
        .size(20.0));

    // Only meaningful when the model actually answered.
    if outcome.failure().is_none() {
        ui.label(format!(
            "📊 Market comparison estimate: {}",
            format_rupees(est.market.price_currency)
        ));

        let (icon, color) = match est.advisory {
            Advisory::SellSoon => ("⚠", WARNING),
            Advisory::GoodResaleValue => ("✅", SUCCESS),
        };
        ui.label(RichText::new(format!("{icon} {}", est.advisory.message())).color(color));
    }

    ui.add_space(6.0);
    ui.label(RichText::new("📉 Depreciation projection (15% per year)").strong().color(HEADING));

    Plot::new("depreciation")
        .height(220.0)
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Price (lakhs)")
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            let pts = est.projection.as_plot_points();
            plot_ui.line(Line::new("Projected value", PlotPoints::new(pts.clone())).color(ACCENT));
            plot_ui.points(Points::new("Yearly", PlotPoints::new(pts)).radius(4.0).color(HEADING));
        });

    ui.add_space(6.0);
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::exact(80.0))
        .column(Column::exact(120.0))
        .column(Column::remainder())
        .header(22.0, |mut header| {
            header.col(|ui| { ui.strong("Year"); });
            header.col(|ui| { ui.strong("Lakhs"); });
            header.col(|ui| { ui.strong("Rupees"); });
        })
        .body(|mut body| {
            for p in &est.projection.points {
                body.row(20.0, |mut row| {
                    row.col(|ui| { ui.label(p.year.to_string()); });
                    row.col(|ui| { ui.label(format_lakhs(p.price_lakhs)); });
                    row.col(|ui| { ui.label(format_rupees(p.price_lakhs * crate::estimator::LAKH)); });
                });
            }
        });
}

impl eframe::App for PredictorApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.show(ctx);
    }
}
