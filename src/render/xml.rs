use super::xml_utils::XmlWriter;
use crate::core::PipelineError;
use crate::document::{DocumentModel, LineEntry, PartySection, PaymentSection, TaxBreakdown};
use crate::profile::ProfileKind;

pub const NS_RSM: &str = "urn:ferd:CrossIndustryDocument:invoice:1p0";
pub const NS_RAM: &str =
    "urn:un:unece:uncefact:data:standard:ReusableAggregateBusinessInformationEntity:12";
pub const NS_UDT: &str = "urn:un:unece:uncefact:data:standard:UnqualifiedDataType:15";

/// Render the ZUGFeRD 1.0 `rsm:CrossIndustryDocument` for a document model.
///
/// Basic documents leave out payment means codes, tax categories, payment
/// terms, prepaid/due totals and per-line trade detail.
pub fn to_xml(model: &DocumentModel) -> Result<String, PipelineError> {
    let comfort = model.profile == ProfileKind::Comfort;
    let mut w = XmlWriter::new()?;

    w.start_element_with_attrs(
        "rsm:CrossIndustryDocument",
        &[
            ("xmlns:rsm", NS_RSM),
            ("xmlns:ram", NS_RAM),
            ("xmlns:udt", NS_UDT),
        ],
    )?;

    let header = &model.header;
    w.start_element("rsm:SpecifiedExchangedDocumentContext")?;
    w.wrapped_text(
        "ram:TestIndicator",
        "udt:Indicator",
        if header.test_indicator { "true" } else { "false" },
    )?;
    w.wrapped_text(
        "ram:GuidelineSpecifiedDocumentContextParameter",
        "ram:ID",
        &header.guideline_id,
    )?;
    w.end_element("rsm:SpecifiedExchangedDocumentContext")?;

    w.start_element("rsm:HeaderExchangedDocument")?;
    w.text_element("ram:ID", &header.id)?;
    w.text_element("ram:Name", &header.name)?;
    w.text_element("ram:TypeCode", &header.type_code)?;
    w.date_element("ram:IssueDateTime", header.issue_date)?;
    for note in &header.notes {
        w.wrapped_text("ram:IncludedNote", "ram:Content", note)?;
    }
    w.end_element("rsm:HeaderExchangedDocument")?;

    w.start_element("rsm:SpecifiedSupplyChainTradeTransaction")?;

    w.start_element("ram:ApplicableSupplyChainTradeAgreement")?;
    write_party(&mut w, "ram:SellerTradeParty", &model.seller)?;
    write_party(&mut w, "ram:BuyerTradeParty", &model.buyer)?;
    w.end_element("ram:ApplicableSupplyChainTradeAgreement")?;

    w.start_element("ram:ApplicableSupplyChainTradeDelivery")?;
    w.start_element("ram:ActualDeliverySupplyChainEvent")?;
    w.date_element("ram:OccurrenceDateTime", header.delivery_date)?;
    w.end_element("ram:ActualDeliverySupplyChainEvent")?;
    w.end_element("ram:ApplicableSupplyChainTradeDelivery")?;

    w.start_element("ram:ApplicableSupplyChainTradeSettlement")?;
    w.text_element("ram:PaymentReference", &model.payment_terms.reference)?;
    w.text_element("ram:InvoiceCurrencyCode", &header.currency)?;
    write_payment_means(&mut w, &model.payment_terms)?;
    write_tax_rows(&mut w, &model.tax_breakdown)?;
    if let Some(terms) = &model.payment_terms.terms {
        w.start_element("ram:SpecifiedTradePaymentTerms")?;
        w.text_element("ram:Description", &terms.description)?;
        w.date_element("ram:DueDateDateTime", terms.due_date)?;
        w.end_element("ram:SpecifiedTradePaymentTerms")?;
    }
    write_summation(&mut w, &model.tax_breakdown)?;
    w.end_element("ram:ApplicableSupplyChainTradeSettlement")?;

    for line in &model.line_items {
        write_line(&mut w, line, &header.currency, comfort)?;
    }

    w.end_element("rsm:SpecifiedSupplyChainTradeTransaction")?;
    w.end_element("rsm:CrossIndustryDocument")?;
    w.into_string()
}

fn write_party(w: &mut XmlWriter, tag: &str, party: &PartySection) -> Result<(), PipelineError> {
    w.start_element(tag)?;
    w.text_element("ram:Name", &party.name)?;
    w.start_element("ram:PostalTradeAddress")?;
    w.text_element("ram:PostcodeCode", &party.postcode)?;
    w.text_element("ram:LineOne", &party.line_one)?;
    if let Some(two) = &party.line_two {
        w.text_element("ram:LineTwo", two)?;
    }
    w.text_element("ram:CityName", &party.city)?;
    w.text_element("ram:CountryID", &party.country_id)?;
    w.end_element("ram:PostalTradeAddress")?;
    for tax_id in &party.tax_ids {
        w.start_element("ram:SpecifiedTaxRegistration")?;
        w.text_element_with_attrs(
            "ram:ID",
            &tax_id.id,
            &[("schemeID", tax_id.scheme_id.as_str())],
        )?;
        w.end_element("ram:SpecifiedTaxRegistration")?;
    }
    w.end_element(tag)?;
    Ok(())
}

fn write_payment_means(w: &mut XmlWriter, payment: &PaymentSection) -> Result<(), PipelineError> {
    for account in &payment.accounts {
        w.start_element("ram:SpecifiedTradeSettlementPaymentMeans")?;
        if let Some(code) = &payment.means_code {
            w.text_element("ram:TypeCode", code)?;
        }
        if let Some(info) = payment.means_information.as_deref().filter(|i| !i.is_empty()) {
            w.text_element("ram:Information", info)?;
        }
        w.wrapped_text(
            "ram:PayeePartyCreditorFinancialAccount",
            "ram:IBANID",
            &account.iban,
        )?;
        w.start_element("ram:PayeeSpecifiedCreditorFinancialInstitution")?;
        w.text_element("ram:BICID", &account.bic)?;
        if !account.institution.is_empty() {
            w.text_element("ram:Name", &account.institution)?;
        }
        w.end_element("ram:PayeeSpecifiedCreditorFinancialInstitution")?;
        w.end_element("ram:SpecifiedTradeSettlementPaymentMeans")?;
    }
    Ok(())
}

fn write_tax_rows(w: &mut XmlWriter, tax: &TaxBreakdown) -> Result<(), PipelineError> {
    for row in &tax.rows {
        w.start_element("ram:ApplicableTradeTax")?;
        w.amount_element("ram:CalculatedAmount", &row.tax, &row.currency)?;
        w.text_element("ram:TypeCode", &row.type_code)?;
        w.amount_element("ram:BasisAmount", &row.base, &row.currency)?;
        if tax.with_category {
            w.text_element("ram:CategoryCode", &row.category_code)?;
        }
        w.text_element("ram:ApplicablePercent", &row.percentage)?;
        w.end_element("ram:ApplicableTradeTax")?;
    }
    Ok(())
}

fn write_summation(w: &mut XmlWriter, tax: &TaxBreakdown) -> Result<(), PipelineError> {
    let s = &tax.summation;
    let cur = s.currency.as_str();
    w.start_element("ram:SpecifiedTradeSettlementMonetarySummation")?;
    w.amount_element("ram:LineTotalAmount", &s.line_total, cur)?;
    w.amount_element("ram:ChargeTotalAmount", &s.charge_total, cur)?;
    w.amount_element("ram:AllowanceTotalAmount", &s.allowance_total, cur)?;
    w.amount_element("ram:TaxBasisTotalAmount", &s.tax_basis_total, cur)?;
    w.amount_element("ram:TaxTotalAmount", &s.tax_total, cur)?;
    w.amount_element("ram:GrandTotalAmount", &s.grand_total, cur)?;
    if let Some(prepaid) = &tax.total_prepaid {
        w.amount_element("ram:TotalPrepaidAmount", prepaid, cur)?;
    }
    if let Some(due) = &tax.due_payable {
        w.amount_element("ram:DuePayableAmount", due, cur)?;
    }
    w.end_element("ram:SpecifiedTradeSettlementMonetarySummation")?;
    Ok(())
}

fn write_line(
    w: &mut XmlWriter,
    line: &LineEntry,
    currency: &str,
    comfort: bool,
) -> Result<(), PipelineError> {
    w.start_element("ram:IncludedSupplyChainTradeLineItem")?;
    let detail = line.detail.as_ref().filter(|_| comfort);

    if let Some(detail) = detail {
        w.wrapped_text("ram:AssociatedDocumentLineDocument", "ram:LineID", &line.line_id)?;
        w.start_element("ram:SpecifiedSupplyChainTradeAgreement")?;
        w.start_element("ram:GrossPriceProductTradePrice")?;
        w.amount_element("ram:ChargeAmount", &detail.gross_price, currency)?;
        w.end_element("ram:GrossPriceProductTradePrice")?;
        w.start_element("ram:NetPriceProductTradePrice")?;
        w.amount_element("ram:ChargeAmount", &detail.net_price, currency)?;
        w.end_element("ram:NetPriceProductTradePrice")?;
        w.end_element("ram:SpecifiedSupplyChainTradeAgreement")?;
    }

    w.start_element("ram:SpecifiedSupplyChainTradeDelivery")?;
    w.text_element_with_attrs(
        "ram:BilledQuantity",
        &line.billed_quantity,
        &[("unitCode", line.unit_code.as_str())],
    )?;
    w.end_element("ram:SpecifiedSupplyChainTradeDelivery")?;

    if let Some(detail) = detail {
        w.start_element("ram:SpecifiedSupplyChainTradeSettlement")?;
        w.start_element("ram:ApplicableTradeTax")?;
        w.text_element("ram:TypeCode", &detail.tax_type_code)?;
        w.text_element("ram:CategoryCode", &detail.tax_category_code)?;
        w.text_element("ram:ApplicablePercent", &detail.tax_percentage)?;
        w.end_element("ram:ApplicableTradeTax")?;
        w.start_element("ram:SpecifiedTradeSettlementMonetarySummation")?;
        w.amount_element("ram:LineTotalAmount", &detail.line_total, currency)?;
        w.end_element("ram:SpecifiedTradeSettlementMonetarySummation")?;
        w.end_element("ram:SpecifiedSupplyChainTradeSettlement")?;
    }

    w.wrapped_text("ram:SpecifiedTradeProduct", "ram:Name", &line.name)?;
    w.end_element("ram:IncludedSupplyChainTradeLineItem")?;
    Ok(())
}
