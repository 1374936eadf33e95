//! Call data for the universal router: a list of one byte commands with
//! ABI encoded inputs, passed to `execute`.

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
        route::SectionPools,
    },
    ethabi::{ParamType, Token as AbiToken},
};

pub const V3_SWAP_EXACT_IN: u8 = 0x00;
pub const V3_SWAP_EXACT_OUT: u8 = 0x01;
pub const SWEEP: u8 = 0x04;
pub const V2_SWAP_EXACT_IN: u8 = 0x08;
pub const V2_SWAP_EXACT_OUT: u8 = 0x09;
pub const WRAP_ETH: u8 = 0x0b;
pub const UNWRAP_WETH: u8 = 0x0c;

/// Amount telling the router to spend its whole balance of the token.
fn contract_balance() -> U256 {
    U256::one() << 255
}

#[derive(Debug, Default)]
struct Planner {
    commands: Vec<u8>,
    inputs: Vec<Vec<u8>>,
}

impl Planner {
    fn add(&mut self, command: u8, args: &[AbiToken]) {
        self.commands.push(command);
        self.inputs.push(ethabi::encode(args));
    }
}

pub fn encode(trade: &Trade, options: &SwapOptions, router: H160) -> Result<MethodParameters, Error> {
    let slippage = &options.slippage_tolerance;
    let trade_type = trade.trade_type();
    let exact_input = trade_type == TradeType::ExactInput;
    let input_is_native = trade.input_token().is_native();
    let output_is_native = trade.output_token().is_native();
    let aggregated_check = exact_input && trade.swaps().len() > 2;
    let router_custody = output_is_native || aggregated_check;
    let recipient = options.recipient.unwrap_or(MSG_SENDER);
    let swap_recipient = if router_custody { ADDRESS_THIS } else { recipient };
    let maximum_in = wei(&trade.maximum_amount_in(slippage))?;

    let mut planner = Planner::default();
    // Native input is wrapped by the router first, which then pays for the
    // swaps out of its own balance.
    if input_is_native {
        planner.add(
            WRAP_ETH,
            &[AbiToken::Address(ADDRESS_THIS), AbiToken::Uint(maximum_in)],
        );
    }
    let payer_is_user = !input_is_native;

    for swap in trade.swaps() {
        let amount_in = wei(&swap.maximum_amount_in(trade_type, slippage))?;
        let amount_out = if aggregated_check {
            U256::zero()
        } else {
            wei(&swap.minimum_amount_out(trade_type, slippage))?
        };

        let sections = swap.route.sections();
        let last = sections.len() - 1;
        for (i, section) in sections.iter().enumerate() {
            let recipient = AbiToken::Address(if i == last {
                swap_recipient
            } else {
                ADDRESS_THIS
            });
            let amount_in = AbiToken::Uint(if i == 0 { amount_in } else { contract_balance() });
            let amount_out = AbiToken::Uint(if i == last { amount_out } else { U256::zero() });
            let payer = AbiToken::Bool(i == 0 && payer_is_user);

            let (command, path) = match &section.pools {
                SectionPools::Simple(_) => {
                    let path = section
                        .path
                        .iter()
                        .map(|token| AbiToken::Address(token.wrapped_address()))
                        .collect();
                    let command = if exact_input {
                        V2_SWAP_EXACT_IN
                    } else {
                        V2_SWAP_EXACT_OUT
                    };
                    (command, AbiToken::Array(path))
                }
                SectionPools::Concentrated(pools) => {
                    let path = encode_path(section.path, pools, !exact_input);
                    let command = if exact_input {
                        V3_SWAP_EXACT_IN
                    } else {
                        V3_SWAP_EXACT_OUT
                    };
                    (command, AbiToken::Bytes(path))
                }
            };
            if exact_input {
                planner.add(command, &[recipient, amount_in, amount_out, path, payer]);
            } else {
                planner.add(command, &[recipient, amount_out, amount_in, path, payer]);
            }
        }
    }

    if router_custody {
        let minimum = AbiToken::Uint(wei(&trade.minimum_amount_out(slippage))?);
        if output_is_native {
            planner.add(UNWRAP_WETH, &[AbiToken::Address(recipient), minimum]);
        } else {
            planner.add(
                SWEEP,
                &[
                    AbiToken::Address(trade.output_token().wrapped_address()),
                    AbiToken::Address(recipient),
                    minimum,
                ],
            );
        }
    }
    // Hand back whatever native input the exact output swaps did not use.
    if input_is_native && !exact_input {
        planner.add(
            UNWRAP_WETH,
            &[AbiToken::Address(MSG_SENDER), AbiToken::Uint(U256::zero())],
        );
    }

    let commands = AbiToken::Bytes(planner.commands);
    let inputs = AbiToken::Array(planner.inputs.into_iter().map(AbiToken::Bytes).collect());
    let calldata = match options.deadline {
        Some(deadline) => encode_call(
            "execute",
            &[
                ParamType::Bytes,
                ParamType::Array(Box::new(ParamType::Bytes)),
                ParamType::Uint(256),
            ],
            &[commands, inputs, AbiToken::Uint(deadline)],
        ),
        None => encode_call(
            "execute",
            &[
                ParamType::Bytes,
                ParamType::Array(Box::new(ParamType::Bytes)),
            ],
            &[commands, inputs],
        ),
    };
    Ok(MethodParameters {
        to: router,
        calldata,
        value: if input_is_native {
            maximum_in
        } else {
            U256::zero()
        },
    })
}
