use merkle_airdrop_program::error::ErrorCode;
use merkle_airdrop_program::state::AirdropState;
use merkle_tree::{AirdropMerkleTree, MerkleProof, TreeNode};

const AUTHORITY: [u8; 32] = [9; 32];
const MINT: [u8; 32] = [7; 32];
const VAULT: [u8; 32] = [8; 32];

fn build_tree(count: u64) -> AirdropMerkleTree {
    let nodes = (0..count)
        .map(|i| {
            let mut claimant = [0u8; 32];
            claimant[..8].copy_from_slice(&(i + 1).to_le_bytes());
            TreeNode {
                claimant,
                proof: None,
                amount: (i + 1) * 100,
            }
        })
        .collect();
    AirdropMerkleTree::new(nodes).unwrap()
}

fn init_state<'a>(
    data: &'a mut [u8],
    tree: &AirdropMerkleTree,
) -> (&'a mut AirdropState, &'a mut [u8]) {
    let (state, bitmap) = unsafe { AirdropState::unpack(data).unwrap() };
    state.initialize(
        tree.merkle_root,
        AUTHORITY,
        MINT,
        VAULT,
        tree.max_total_claim,
        tree.max_num_nodes,
        tree.max_num_nodes,
        254,
    );
    (state, bitmap)
}

fn claim_args(node: &TreeNode) -> (Vec<u8>, u64) {
    let proof = node.proof.as_ref().unwrap();
    (proof.to_bytes(), proof.index)
}

#[test]
fn end_to_end_claim_lifecycle() {
    let tree = build_tree(100);
    let mut data = vec![0u8; AirdropState::account_len(tree.max_num_nodes)];
    let (state, bitmap) = init_state(&mut data, &tree);

    assert_eq!(state.root, tree.merkle_root);
    assert_eq!(state.total_amount(), tree.max_total_claim);
    assert_eq!(state.amount_claimed(), 0);

    // first claim for entry #0 succeeds and the accounting moves by exactly
    // the committed amount
    let node = tree.tree_nodes[0].clone();
    let (proof_bytes, index) = claim_args(&node);
    state
        .process_claim(bitmap, &node.claimant, node.amount, &proof_bytes, index)
        .unwrap();
    assert_eq!(state.amount_claimed(), node.amount);
    assert_eq!(state.num_nodes_claimed(), 1);
    assert!(AirdropState::is_claimed(bitmap, index));

    // identical repeated call fails and changes nothing
    let err = state
        .process_claim(bitmap, &node.claimant, node.amount, &proof_bytes, index)
        .unwrap_err();
    assert_eq!(err, ErrorCode::AlreadyClaimed);
    assert_eq!(state.amount_claimed(), node.amount);
    assert_eq!(state.num_nodes_claimed(), 1);

    // update-root by a non-authority is rejected and the root is unchanged
    let intruder = [1u8; 32];
    let err = state
        .update_root(&intruder, [0xAA; 32], tree.max_num_nodes)
        .unwrap_err();
    assert_eq!(err, ErrorCode::Unauthorized);
    assert_eq!(state.root, tree.merkle_root);

    // other indices are unaffected by the claimed one
    let other = tree.tree_nodes[1].clone();
    let (proof_bytes, index) = claim_args(&other);
    state
        .process_claim(bitmap, &other.claimant, other.amount, &proof_bytes, index)
        .unwrap();
    assert_eq!(state.num_nodes_claimed(), 2);
    assert_eq!(state.amount_claimed(), node.amount + other.amount);
}

#[test]
fn every_entitlement_claims_exactly_once() {
    let tree = build_tree(33);
    let mut data = vec![0u8; AirdropState::account_len(tree.max_num_nodes)];
    let (state, bitmap) = init_state(&mut data, &tree);

    for node in &tree.tree_nodes {
        let (proof_bytes, index) = claim_args(node);
        state
            .process_claim(bitmap, &node.claimant, node.amount, &proof_bytes, index)
            .unwrap();
    }
    assert_eq!(state.amount_claimed(), tree.max_total_claim);
    assert_eq!(state.num_nodes_claimed(), tree.max_num_nodes);

    for node in &tree.tree_nodes {
        let (proof_bytes, index) = claim_args(node);
        assert_eq!(
            state
                .process_claim(bitmap, &node.claimant, node.amount, &proof_bytes, index)
                .unwrap_err(),
            ErrorCode::AlreadyClaimed
        );
    }
}

#[test]
fn wrong_amount_fails_verification() {
    let tree = build_tree(10);
    let mut data = vec![0u8; AirdropState::account_len(tree.max_num_nodes)];
    let (state, bitmap) = init_state(&mut data, &tree);

    let node = &tree.tree_nodes[4];
    let (proof_bytes, index) = claim_args(node);
    let err = state
        .process_claim(bitmap, &node.claimant, node.amount + 1, &proof_bytes, index)
        .unwrap_err();
    assert_eq!(err, ErrorCode::InvalidProof);
    assert_eq!(state.amount_claimed(), 0);
    assert!(!AirdropState::is_claimed(bitmap, index));
}

#[test]
fn foreign_signer_fails_verification() {
    let tree = build_tree(10);
    let mut data = vec![0u8; AirdropState::account_len(tree.max_num_nodes)];
    let (state, bitmap) = init_state(&mut data, &tree);

    // a proof for someone else's entitlement never verifies for this signer
    let node = &tree.tree_nodes[2];
    let thief = tree.tree_nodes[3].claimant;
    let (proof_bytes, index) = claim_args(node);
    let err = state
        .process_claim(bitmap, &thief, node.amount, &proof_bytes, index)
        .unwrap_err();
    assert_eq!(err, ErrorCode::InvalidProof);
}

#[test]
fn stale_proof_fails_after_root_update() {
    let tree_v1 = build_tree(10);
    let mut data = vec![0u8; AirdropState::account_len(tree_v1.max_num_nodes)];
    let (state, bitmap) = init_state(&mut data, &tree_v1);

    // commit a new snapshot with different amounts
    let nodes_v2 = tree_v1
        .tree_nodes
        .iter()
        .map(|n| TreeNode {
            claimant: n.claimant,
            proof: None,
            amount: n.amount * 2,
        })
        .collect();
    let tree_v2 = AirdropMerkleTree::new(nodes_v2).unwrap();
    state
        .update_root(&AUTHORITY, tree_v2.merkle_root, tree_v2.max_num_nodes)
        .unwrap();

    // the old proof no longer verifies
    let old_node = &tree_v1.tree_nodes[5];
    let (proof_bytes, index) = claim_args(old_node);
    assert_eq!(
        state
            .process_claim(bitmap, &old_node.claimant, old_node.amount, &proof_bytes, index)
            .unwrap_err(),
        ErrorCode::InvalidProof
    );

    // the matching proof from the new snapshot does
    let new_node = tree_v2.get_node(&old_node.claimant).unwrap();
    let (proof_bytes, index) = claim_args(new_node);
    state
        .process_claim(bitmap, &new_node.claimant, new_node.amount, &proof_bytes, index)
        .unwrap();
}

#[test]
fn index_beyond_bitmap_capacity_rejected() {
    // state sized for fewer entitlements than the committed tree: a genuine
    // proof past the bitmap must not write out of range
    let tree = build_tree(8);
    let capacity = 2u64;
    let mut data = vec![0u8; AirdropState::account_len(capacity)];
    let (state, bitmap) = unsafe { AirdropState::unpack(&mut data).unwrap() };
    state.initialize(
        tree.merkle_root,
        AUTHORITY,
        MINT,
        VAULT,
        tree.max_total_claim,
        capacity,
        capacity,
        254,
    );

    let node = &tree.tree_nodes[5];
    let (proof_bytes, index) = claim_args(node);
    assert_eq!(
        state
            .process_claim(bitmap, &node.claimant, node.amount, &proof_bytes, index)
            .unwrap_err(),
        ErrorCode::IndexOutOfRange
    );
}

#[test]
fn edge_proof_replay_past_tree_rejected() {
    // a 3-leaf tree pads the unpaired leaf against itself, so the exact
    // proof bytes of index 2 also recompute the root under index 3; with
    // spare bitmap capacity that replay must still be rejected
    let tree = build_tree(3);
    let capacity = 4u64;
    let mut data = vec![0u8; AirdropState::account_len(capacity)];
    let (state, bitmap) = unsafe { AirdropState::unpack(&mut data).unwrap() };
    state.initialize(
        tree.merkle_root,
        AUTHORITY,
        MINT,
        VAULT,
        tree.max_total_claim,
        capacity,
        tree.max_num_nodes,
        254,
    );

    let edge = tree
        .tree_nodes
        .iter()
        .find(|n| n.proof.as_ref().unwrap().index == tree.max_num_nodes - 1)
        .unwrap();
    let (proof_bytes, index) = claim_args(edge);
    state
        .process_claim(bitmap, &edge.claimant, edge.amount, &proof_bytes, index)
        .unwrap();

    let err = state
        .process_claim(bitmap, &edge.claimant, edge.amount, &proof_bytes, index + 1)
        .unwrap_err();
    assert_eq!(err, ErrorCode::IndexOutOfRange);
    assert_eq!(state.amount_claimed(), edge.amount);
    assert_eq!(state.num_nodes_claimed(), 1);
    assert!(!AirdropState::is_claimed(bitmap, index + 1));
}

#[test]
fn root_update_bounded_by_bitmap_capacity() {
    let tree = build_tree(4);
    let mut data = vec![0u8; AirdropState::account_len(tree.max_num_nodes)];
    let (state, _bitmap) = init_state(&mut data, &tree);

    // a committed tree larger than the bitmap is rejected wholesale
    let bigger = build_tree(6);
    let err = state
        .update_root(&AUTHORITY, bigger.merkle_root, bigger.max_num_nodes)
        .unwrap_err();
    assert_eq!(err, ErrorCode::ExceededNodeCapacity);
    assert_eq!(state.root, tree.merkle_root);
    assert_eq!(state.num_nodes(), tree.max_num_nodes);

    // shrinking within capacity is fine and narrows the claimable range
    let smaller = build_tree(2);
    state
        .update_root(&AUTHORITY, smaller.merkle_root, smaller.max_num_nodes)
        .unwrap();
    assert_eq!(state.num_nodes(), 2);
}

#[test]
fn claim_exceeding_total_amount_rejected() {
    let tree = build_tree(4);
    let mut data = vec![0u8; AirdropState::account_len(tree.max_num_nodes)];
    let (state, bitmap) = unsafe { AirdropState::unpack(&mut data).unwrap() };
    // understate the committed total; the cap must hold even though every
    // proof is genuine
    state.initialize(
        tree.merkle_root,
        AUTHORITY,
        MINT,
        VAULT,
        tree.tree_nodes[0].amount,
        tree.max_num_nodes,
        tree.max_num_nodes,
        254,
    );

    let first = &tree.tree_nodes[0];
    let (proof_bytes, index) = claim_args(first);
    state
        .process_claim(bitmap, &first.claimant, first.amount, &proof_bytes, index)
        .unwrap();

    let second = &tree.tree_nodes[1];
    let (proof_bytes, index) = claim_args(second);
    assert_eq!(
        state
            .process_claim(bitmap, &second.claimant, second.amount, &proof_bytes, index)
            .unwrap_err(),
        ErrorCode::ExceededTotalAmount
    );
}

#[test]
fn malformed_proof_rejected() {
    let tree = build_tree(8);
    let mut data = vec![0u8; AirdropState::account_len(tree.max_num_nodes)];
    let (state, bitmap) = init_state(&mut data, &tree);

    let node = &tree.tree_nodes[0];
    let (mut proof_bytes, index) = claim_args(node);
    proof_bytes.pop(); // no longer a whole number of siblings
    assert_eq!(
        state
            .process_claim(bitmap, &node.claimant, node.amount, &proof_bytes, index)
            .unwrap_err(),
        ErrorCode::InvalidProof
    );
}

#[test]
fn account_len_covers_bitmap() {
    assert_eq!(AirdropState::account_len(0), AirdropState::LEN);
    assert_eq!(AirdropState::account_len(1), AirdropState::LEN + 1);
    assert_eq!(AirdropState::account_len(8), AirdropState::LEN + 1);
    assert_eq!(AirdropState::account_len(9), AirdropState::LEN + 2);
    assert_eq!(AirdropState::account_len(64), AirdropState::LEN + 8);
}

#[test]
fn proof_wire_form_matches_builder() {
    // the wire bytes the claim instruction receives reconstruct the proof
    let tree = build_tree(6);
    let node = &tree.tree_nodes[3];
    let proof = node.proof.as_ref().unwrap();
    let restored = MerkleProof::from_bytes(proof.index, &proof.to_bytes()).unwrap();
    assert_eq!(&restored, proof);
}
