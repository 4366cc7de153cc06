//! Handlers for `labelsmith export` and `labelsmith descriptions`.

use crate::cli::{output, DescriptionsArgs, ExportArgs, ExportCommand};
use crate::document::export::{generate_box_labels, generate_erp_import, unique_descriptions};
use crate::document::ExtraFields;
use crate::error::{Error, Result};

pub fn execute(command: &ExportCommand) -> Result<()> {
    let (args, label) = match command {
        ExportCommand::Box(args) => (args, "Box-labels export"),
        ExportCommand::Erp(args) => (args, "ERP-import export"),
    };

    let descriptions = if args.all {
        unique_descriptions(&args.input)?
    } else if args.descriptions.is_empty() {
        return Err(Error::InvalidArgument(
            "select at least one --description or pass --all".to_string(),
        ));
    } else {
        args.descriptions.clone()
    };

    let extra = extra_fields(args);
    let rows = match command {
        ExportCommand::Box(_) => {
            generate_box_labels(&args.input, &args.output, &descriptions, &extra)?
        }
        ExportCommand::Erp(_) => {
            generate_erp_import(&args.input, &args.output, &descriptions, &extra)?
        }
    };

    output::ok(&format!(
        "{label} written to {} ({rows} rows)",
        args.output.display()
    ));
    Ok(())
}

pub fn list_descriptions(args: &DescriptionsArgs) -> Result<()> {
    let descriptions = unique_descriptions(&args.input)?;

    output::section("Descriptions");
    if descriptions.is_empty() {
        output::note("No descriptions found.");
        return Ok(());
    }
    for description in descriptions {
        output::note(&format!("  {description}"));
    }
    Ok(())
}

fn extra_fields(args: &ExportArgs) -> ExtraFields {
    ExtraFields {
        customer: args.customer.clone(),
        sales_note: args.sales_note.clone(),
        production_note: args.production_note.clone(),
        bus_model: args.bus_model.clone(),
        board_password: args.board_password.clone(),
        ssh_cert_path: args.ssh_cert.clone(),
        ovpn_cert_path: args.ovpn_cert.clone(),
        vpn_ip: args.vpn_ip.clone(),
        purchase_order: args.purchase_order.clone(),
        transport_authority: args.transport_authority.clone(),
        unit_code: args.unit_code.clone(),
        order_date: args.order_date.clone(),
    }
}
