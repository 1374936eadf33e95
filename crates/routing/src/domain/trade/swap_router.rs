//! Call data for `SwapRouter02`: one call per swap (per section for mixed
//! routes), batched into a `multicall`.

use {
    super::{
        ADDRESS_THIS,
        Error,
        MSG_SENDER,
        MethodParameters,
        SwapOptions,
        Trade,
        encode_call,
        encode_path,
        wei,
    },
    crate::domain::{
        eth::{H160, U256},
        quote::TradeType,
        route::{Section, SectionPools},
    },
    ethabi::{ParamType, Token as AbiToken},
};

pub fn encode(trade: &Trade, options: &SwapOptions, router: H160) -> Result<MethodParameters, Error> {
    let slippage = &options.slippage_tolerance;
    let trade_type = trade.trade_type();
    let exact_input = trade_type == TradeType::ExactInput;
    let input_is_native = trade.input_token().is_native();
    let output_is_native = trade.output_token().is_native();
    // With many swaps the minimum output is only checked once, on the total.
    let aggregated_check = exact_input && trade.swaps().len() > 2;
    let router_custody = output_is_native || aggregated_check;
    let swap_recipient = if router_custody {
        ADDRESS_THIS
    } else {
        options.recipient.unwrap_or(MSG_SENDER)
    };

    let mut calls = Vec::new();
    for swap in trade.swaps() {
        let amount_in = wei(&swap.maximum_amount_in(trade_type, slippage))?;
        let amount_out = if aggregated_check {
            U256::zero()
        } else {
            wei(&swap.minimum_amount_out(trade_type, slippage))?
        };

        // Sections after the first spend the router's balance, which
        // `SwapRouter02` reads from a zero input amount.
        let sections = swap.route.sections();
        let last = sections.len() - 1;
        for (i, section) in sections.iter().enumerate() {
            calls.push(section_call(
                section,
                exact_input,
                if i == 0 { amount_in } else { U256::zero() },
                if i == last { amount_out } else { U256::zero() },
                if i == last { swap_recipient } else { ADDRESS_THIS },
            ));
        }
    }

    if router_custody {
        let minimum = AbiToken::Uint(wei(&trade.minimum_amount_out(slippage))?);
        let output = AbiToken::Address(trade.output_token().wrapped_address());
        calls.push(match (output_is_native, options.recipient) {
            (true, Some(recipient)) => encode_call(
                "unwrapWETH9",
                &[ParamType::Uint(256), ParamType::Address],
                &[minimum, AbiToken::Address(recipient)],
            ),
            (true, None) => encode_call("unwrapWETH9", &[ParamType::Uint(256)], &[minimum]),
            (false, Some(recipient)) => encode_call(
                "sweepToken",
                &[ParamType::Address, ParamType::Uint(256), ParamType::Address],
                &[output, minimum, AbiToken::Address(recipient)],
            ),
            (false, None) => encode_call(
                "sweepToken",
                &[ParamType::Address, ParamType::Uint(256)],
                &[output, minimum],
            ),
        });
    }
    if input_is_native && !exact_input {
        calls.push(encode_call("refundETH", &[], &[]));
    }

    let value = if input_is_native {
        wei(&trade.maximum_amount_in(slippage))?
    } else {
        U256::zero()
    };
    let calldata = match (options.deadline, calls.len()) {
        (Some(deadline), _) => encode_call(
            "multicall",
            &[
                ParamType::Uint(256),
                ParamType::Array(Box::new(ParamType::Bytes)),
            ],
            &[AbiToken::Uint(deadline), bytes_array(calls)],
        ),
        (None, 1) => calls.pop().unwrap_or_default(),
        (None, _) => encode_call(
            "multicall",
            &[ParamType::Array(Box::new(ParamType::Bytes))],
            &[bytes_array(calls)],
        ),
    };
    Ok(MethodParameters {
        to: router,
        calldata,
        value,
    })
}

fn bytes_array(calls: Vec<Vec<u8>>) -> AbiToken {
    AbiToken::Array(calls.into_iter().map(AbiToken::Bytes).collect())
}

/// Encodes the swap through one section. For exact output trades
/// `amount_in` is the maximum input and `amount_out` the exact output.
fn section_call(
    section: &Section,
    exact_input: bool,
    amount_in: U256,
    amount_out: U256,
    recipient: H160,
) -> Vec<u8> {
    let (amount_in, amount_out, recipient) = (
        AbiToken::Uint(amount_in),
        AbiToken::Uint(amount_out),
        AbiToken::Address(recipient),
    );
    match &section.pools {
        SectionPools::Simple(_) => {
            let path = AbiToken::Array(
                section
                    .path
                    .iter()
                    .map(|token| AbiToken::Address(token.wrapped_address()))
                    .collect(),
            );
            let params = [
                ParamType::Uint(256),
                ParamType::Uint(256),
                ParamType::Array(Box::new(ParamType::Address)),
                ParamType::Address,
            ];
            if exact_input {
                encode_call(
                    "swapExactTokensForTokens",
                    &params,
                    &[amount_in, amount_out, path, recipient],
                )
            } else {
                encode_call(
                    "swapTokensForExactTokens",
                    &params,
                    &[amount_out, amount_in, path, recipient],
                )
            }
        }
        SectionPools::Concentrated(pools) if pools.len() == 1 => {
            let params = [ParamType::Tuple(vec![
                ParamType::Address,
                ParamType::Address,
                ParamType::Uint(24),
                ParamType::Address,
                ParamType::Uint(256),
                ParamType::Uint(256),
                ParamType::Uint(160),
            ])];
            let token_in = AbiToken::Address(section.path[0].wrapped_address());
            let token_out = AbiToken::Address(section.path[1].wrapped_address());
            let fee = AbiToken::Uint(pools[0].fee.pips().into());
            let no_price_limit = AbiToken::Uint(U256::zero());
            if exact_input {
                encode_call(
                    "exactInputSingle",
                    &params,
                    &[AbiToken::Tuple(vec![
                        token_in,
                        token_out,
                        fee,
                        recipient,
                        amount_in,
                        amount_out,
                        no_price_limit,
                    ])],
                )
            } else {
                encode_call(
                    "exactOutputSingle",
                    &params,
                    &[AbiToken::Tuple(vec![
                        token_in,
                        token_out,
                        fee,
                        recipient,
                        amount_out,
                        amount_in,
                        no_price_limit,
                    ])],
                )
            }
        }
        SectionPools::Concentrated(pools) => {
            let path = AbiToken::Bytes(encode_path(section.path, pools, !exact_input));
            let params = [ParamType::Tuple(vec![
                ParamType::Bytes,
                ParamType::Address,
                ParamType::Uint(256),
                ParamType::Uint(256),
            ])];
            if exact_input {
                encode_call(
                    "exactInput",
                    &params,
                    &[AbiToken::Tuple(vec![path, recipient, amount_in, amount_out])],
                )
            } else {
                encode_call(
                    "exactOutput",
                    &params,
                    &[AbiToken::Tuple(vec![path, recipient, amount_out, amount_in])],
                )
            }
        }
    }
}
