use cartwright::pricing::format_amount;
use cartwright_app::context::AppContext;

pub(crate) async fn run(ctx: &AppContext) -> Result<(), String> {
    let products = ctx
        .catalog
        .list_products()
        .await
        .map_err(|error| format!("failed to list products: {error}"))?;

    for product in products {
        println!(
            "{}: {} ({})",
            product.id,
            product.name,
            format_amount(product.price, ctx.currency)
        );
    }

    Ok(())
}
