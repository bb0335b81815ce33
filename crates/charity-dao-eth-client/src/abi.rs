//! Solidity interfaces of the deployed contracts.
//!
//! Every registry write takes the DAO address first; the remaining
//! identifiers and URIs are plain strings.

use alloy_sol_types::sol;

sol! {
    /// ERC-4824 registry.
    interface IERC4824Registry {
        function daoUpdate(address daoAddress, string name, string description, string governanceURI) external;
        function memberUpdate(address daoAddress, address member, string memberURI) external;
        function proposalUpdate(address daoAddress, string proposalId, string proposalURI) external;
        function activityLogUpdate(address daoAddress, string activityId, string activityLogURI) external;
        function governanceUpdate(address daoAddress, string governanceURI) external;
    }

    /// ERC-20 with the votes extension.
    interface IGovernanceToken {
        function balanceOf(address account) external view returns (uint256);
        function delegates(address account) external view returns (address);
        function getVotes(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
        function delegate(address delegatee) external;
    }

    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function transfer(address to, uint256 amount) external returns (bool);
    }
}
