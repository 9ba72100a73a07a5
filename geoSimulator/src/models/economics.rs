//! Levelized cost of electricity or heat under the three economic models.

use tracing::debug;

use crate::config::const_funcs::average;
use crate::config::constants::{CENTS_PER_KWH_TO_DOLLARS_PER_MMBTU, DOLLARS_TO_CENTS_PER_KWH};
use crate::config::options::{EconomicModel, EndUseOption, PrimaryProduct};
use crate::config::parameters::{FinancialParameters, ModelParameters};
use crate::core::error::SimulationError;
use crate::core::results::{AnnualEnergy, EconomicOutput};

/// The priced product with its yearly energy and the co-product cash flows
/// that shift its cost (M$/year).
struct PricedProduct<'a> {
    label: &'static str,
    energy: &'a [f64],
    extra_costs: Vec<f64>,
    income: Vec<f64>,
    per_mmbtu: bool,
}

impl<'a> PricedProduct<'a> {
    fn for_end_use(params: &ModelParameters, annual: &'a AnnualEnergy) -> Self {
        let costs = &params.costs;
        let years = annual.net_electricity_produced.len();
        let dollars = |kwh: &[f64], price: f64| kwh.iter().map(|e| e * price / 1e6).collect::<Vec<_>>();
        match params.simulation.end_use {
            EndUseOption::Electricity => Self {
                label: "net electricity",
                energy: &annual.net_electricity_produced,
                extra_costs: vec![0.0; years],
                income: vec![0.0; years],
                per_mmbtu: false,
            },
            EndUseOption::DirectUseHeat => Self {
                label: "heat produced",
                energy: &annual.heat_produced,
                extra_costs: dollars(&annual.pumping, costs.electricity_price),
                income: vec![0.0; years],
                per_mmbtu: true,
            },
            cogeneration => match cogeneration.primary_product() {
                PrimaryProduct::Electricity => Self {
                    label: "net electricity",
                    energy: &annual.net_electricity_produced,
                    extra_costs: vec![0.0; years],
                    income: dollars(&annual.heat_produced, costs.heat_price),
                    per_mmbtu: false,
                },
                PrimaryProduct::Heat => Self {
                    label: "heat produced",
                    energy: &annual.heat_produced,
                    extra_costs: vec![0.0; years],
                    income: dollars(&annual.net_electricity_produced, costs.electricity_price),
                    per_mmbtu: true,
                },
            },
        }
    }

    fn checked_denominator(&self, denominator: f64) -> Result<f64, SimulationError> {
        if denominator == 0.0 || !denominator.is_finite() {
            return Err(SimulationError::ZeroEnergyDenominator(self.label));
        }
        Ok(denominator)
    }

    fn to_price(&self, cents_per_kwh: f64) -> f64 {
        if self.per_mmbtu {
            cents_per_kwh * CENTS_PER_KWH_TO_DOLLARS_PER_MMBTU
        } else {
            cents_per_kwh
        }
    }
}

fn weighted_sum(values: &[f64], weights: &[f64]) -> f64 {
    values.iter().zip(weights).map(|(v, w)| v * w).sum()
}

fn fixed_charge_rate(
    fin: &FinancialParameters,
    capital: f64,
    om: f64,
    product: &PricedProduct,
) -> Result<f64, SimulationError> {
    let energy = product.checked_denominator(average(product.energy))?;
    let annual_cost = fin.fixed_charge_rate * (1.0 + fin.construction_inflation_rate) * capital
        + om
        + average(&product.extra_costs)
        - average(&product.income);
    Ok(annual_cost / energy * DOLLARS_TO_CENTS_PER_KWH)
}

fn standard_levelized(
    fin: &FinancialParameters,
    capital: f64,
    om: f64,
    product: &PricedProduct,
) -> Result<f64, SimulationError> {
    let discount: Vec<f64> = (0..fin.plant_lifetime)
        .map(|year| (1.0 + fin.discount_rate).powi(-(year as i32)))
        .collect();
    let energy = product.checked_denominator(weighted_sum(product.energy, &discount))?;
    let yearly_cost: Vec<f64> = product
        .extra_costs
        .iter()
        .zip(&product.income)
        .map(|(extra, income)| om + extra - income)
        .collect();
    let cost = (1.0 + fin.construction_inflation_rate) * capital + weighted_sum(&yearly_cost, &discount);
    Ok(cost / energy * DOLLARS_TO_CENTS_PER_KWH)
}

/// Discounted cash flow with blended debt/equity return, inflation and taxes.
fn bicycle(
    fin: &FinancialParameters,
    capital: f64,
    om: f64,
    product: &PricedProduct,
) -> Result<f64, SimulationError> {
    let lifetime = fin.plant_lifetime as f64;
    let tax = fin.income_tax_rate;
    let blended_return =
        fin.bond_fraction * fin.bond_interest_rate * (1.0 - tax) + (1.0 - fin.bond_fraction) * fin.equity_interest_rate;
    let recovery_factor = blended_return / (1.0 - (1.0 + blended_return).powf(-lifetime));

    let years = 1..=fin.plant_lifetime;
    let inflation: Vec<f64> = years.clone().map(|t| (1.0 + fin.inflation_rate).powi(t as i32)).collect();
    let discount: Vec<f64> = years.map(|t| (1.0 + blended_return).powi(-(t as i32))).collect();
    let weights: Vec<f64> = inflation.iter().zip(&discount).map(|(i, d)| i * d).collect();

    let energy = product.checked_denominator(weighted_sum(product.energy, &weights))?;

    let capex = (1.0 + fin.construction_inflation_rate) * capital;
    let total_discount: f64 = discount.iter().sum();
    let npv_capital = capex * recovery_factor * total_discount;
    let npv_property_tax = capex * fin.property_tax_rate * weights.iter().sum::<f64>();
    let npv_income_tax =
        tax / (1.0 - tax) * (capex * recovery_factor - capital / lifetime) * total_discount;
    let npv_tax_credit = capex * fin.investment_tax_credit_rate / (1.0 - tax);
    let yearly_om: Vec<f64> = product.extra_costs.iter().map(|extra| om + extra).collect();
    let npv_om = weighted_sum(&yearly_om, &weights);
    let subtotal = npv_capital + npv_om + npv_property_tax + npv_income_tax - npv_tax_credit;
    let npv_revenue_tax = fin.gross_revenue_tax_rate / (1.0 - fin.gross_revenue_tax_rate) * subtotal;
    let npv_income = weighted_sum(&product.income, &weights);

    Ok((subtotal + npv_revenue_tax - npv_income) / energy * DOLLARS_TO_CENTS_PER_KWH)
}

pub fn levelized_cost(
    params: &ModelParameters,
    capital: f64,
    operating: f64,
    annual: &AnnualEnergy,
) -> Result<EconomicOutput, SimulationError> {
    let fin = &params.financial;
    let product = PricedProduct::for_end_use(params, annual);
    let cents_per_kwh = match fin.economic_model {
        EconomicModel::FixedChargeRate => fixed_charge_rate(fin, capital, operating, &product)?,
        EconomicModel::StandardLevelized => standard_levelized(fin, capital, operating, &product)?,
        EconomicModel::Bicycle => bicycle(fin, capital, operating, &product)?,
    };
    let price = product.to_price(cents_per_kwh);
    if !price.is_finite() {
        return Err(SimulationError::NonFiniteResult(format!(
            "{:?} price for {}",
            fin.economic_model, product.label
        )));
    }

    let average_annual_pumping_cost = if params.simulation.end_use == EndUseOption::DirectUseHeat {
        average(&annual.pumping) * params.costs.electricity_price / 1e6
    } else {
        0.0
    };

    debug!("{:?} levelized price for {}: {:.4}", fin.economic_model, product.label, price);

    Ok(EconomicOutput {
        price,
        average_annual_pumping_cost,
    })
}
