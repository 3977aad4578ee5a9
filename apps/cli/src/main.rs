use std::{process::ExitCode, sync::Arc};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    checkout::validate_checkout_form, load_settings, CartControl, CartUpdateClient,
    CheckoutClient, CheckoutFlow, ClickOutcome, PageHost, SecurityToken, SessionContext,
};
use shared::{
    domain::{CheckoutForm, ShippingOption},
    protocol::{OrderLine, OrderSnapshot},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "storefront", about = "Drive storefront cart and checkout calls")]
struct Cli {
    /// Overrides the configured storefront base url.
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Logged-in user as the page template renders it.
    #[arg(long, global = true, default_value = "AnonymousUser")]
    user: String,
    /// Raw `Cookie` header to read the security token from.
    #[arg(long, global = true, default_value = "")]
    cookie: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Click an update-cart control.
    UpdateItem {
        #[arg(long)]
        product: String,
        #[arg(long)]
        action: String,
    },
    /// Validate the checkout details and shipping choice.
    Checkout {
        #[command(flatten)]
        details: DetailsArgs,
        /// Selected shipping method, if any.
        #[arg(long)]
        shipping: Option<String>,
    },
    /// Submit an order snapshot.
    ProcessOrder {
        #[command(flatten)]
        details: DetailsArgs,
        /// Order line as `name:quantity:price`; repeatable.
        #[arg(long = "item", value_parser = parse_order_line)]
        items: Vec<OrderLine>,
    },
}

#[derive(Args, Debug)]
struct DetailsArgs {
    #[arg(long, default_value = "")]
    first_name: String,
    #[arg(long, default_value = "")]
    last_name: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    address: String,
    #[arg(long)]
    city: Option<String>,
    #[arg(long, default_value = "")]
    state: String,
    #[arg(long, default_value = "")]
    zip: String,
}

impl From<DetailsArgs> for CheckoutForm {
    fn from(args: DetailsArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            address: args.address,
            city: args.city,
            state: args.state,
            zip: args.zip,
        }
    }
}

fn parse_order_line(raw: &str) -> Result<OrderLine, String> {
    let mut parts = raw.rsplitn(3, ':');
    let (Some(price), Some(quantity), Some(name)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("expected name:quantity:price, got {raw:?}"));
    };
    Ok(OrderLine {
        name: name.to_string(),
        quantity: quantity
            .parse()
            .map_err(|e| format!("invalid quantity {quantity:?}: {e}"))?,
        price: price
            .parse()
            .map_err(|e| format!("invalid price {price:?}: {e}"))?,
    })
}

/// Stands in for the browser page: prints what the page would do.
struct ConsoleHost;

impl PageHost for ConsoleHost {
    fn reload(&self) {
        info!("page reload requested");
        println!("reload");
    }

    fn navigate(&self, path: &str) {
        info!(path, "navigation requested");
        println!("navigate {path}");
    }

    fn alert(&self, message: &str) {
        eprintln!("alert: {message}");
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
    }
    let token = SecurityToken::from_cookie_header(&cli.cookie, &settings.csrf_cookie_name);
    let session = SessionContext::from_template_user(&cli.user, token);
    let host: Arc<dyn PageHost> = Arc::new(ConsoleHost);

    let succeeded = match cli.command {
        Command::UpdateItem { product, action } => {
            let client = CartUpdateClient::new(&settings, session, host)
                .context("failed to build cart client")?;
            let outcome = client
                .handle_control_click(&CartControl::new(product, action))
                .await;
            println!("{outcome:?}");
            outcome == ClickOutcome::Reloaded
        }
        Command::Checkout { details, shipping } => {
            let flow = CheckoutFlow::new(host);
            let form = CheckoutForm::from(details);
            let options: Vec<ShippingOption> = shipping
                .into_iter()
                .map(|value| ShippingOption {
                    value,
                    checked: true,
                })
                .collect();
            flow.proceed_to_shipping(&form) && flow.proceed_to_payment(&options)
        }
        Command::ProcessOrder { details, items } => {
            let form = CheckoutForm::from(details);
            validate_checkout_form(&form).map_err(|err| anyhow!(err))?;
            let client = CheckoutClient::new(&settings, session, host)
                .context("failed to build checkout client")?;
            let snapshot = OrderSnapshot::from_form(&form, items);
            println!(
                "submitting {}",
                serde_json::to_string(&snapshot).context("failed to encode order")?
            );
            client.place_order_and_redirect(&snapshot).await
        }
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
